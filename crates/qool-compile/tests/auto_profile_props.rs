//! Property-based tests for the automatic profile.
//!
//! Whenever the feasible interval is non-empty the automatic profile must
//! return a converter inside it, and no larger feasible energy may exist.

use proptest::prelude::*;
use qool_compile::{CompileError, CompilerProfile, FeasibleInterval, ProgramMetrics, select_scale};
use qool_hal::{Device, DeviceSpec, UnitConverter};

fn arb_device() -> impl Strategy<Value = Device> {
    (
        1.0_f64..50.0,
        prop_oneof![Just(0.0), 1.0_f64..10.0],
        prop::option::of(100.0_f64..10_000.0),
        1e4_f64..1e7,
    )
        .prop_map(|(max_amp, min_dist, max_dur, c6)| {
            Device::from_spec(DeviceSpec {
                name: "prop".into(),
                max_amplitude: max_amp,
                max_abs_detuning: None,
                max_duration: max_dur,
                min_distance: min_dist,
                interaction_coefficient: c6,
                clock_period: 1.0,
                max_atoms: None,
                max_radial_distance: None,
                time_energy_product: 1000.0,
            })
            .unwrap()
        })
}

fn arb_metrics() -> impl Strategy<Value = ProgramMetrics> {
    (
        0_usize..6,
        0.2_f64..3.0,
        prop_oneof![Just(0.0), 0.01_f64..2.0],
        0.1_f64..20.0,
    )
        .prop_map(|(n, d, a, t)| {
            let distance = if n >= 2 { Some(d) } else { None };
            ProgramMetrics::new(n, distance, a, 0.0, t).unwrap()
        })
}

proptest! {
    #[test]
    fn auto_is_feasible_and_maximal(device in arb_device(), metrics in arb_metrics()) {
        let interval = FeasibleInterval::from_constraints(&metrics, &device);
        match select_scale(&CompilerProfile::Auto, &metrics, &device) {
            Ok(converter) => {
                let energy = converter.energy_scale();
                prop_assert!(interval.contains(energy));
                if interval.upper().is_some() {
                    prop_assert!(!interval.contains(energy * 1.001));
                }
            }
            Err(CompileError::Infeasible(_)) => prop_assert!(interval.is_empty()),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn auto_respects_every_device_limit(device in arb_device(), metrics in arb_metrics()) {
        if let Ok(converter) = select_scale(&CompilerProfile::Auto, &metrics, &device) {
            let physical = metrics.physical(&converter);
            let slack = 1.0 + 1e-9;
            prop_assert!(physical.amplitude <= device.max_amplitude() * slack);
            if let Some(max_duration) = device.max_duration() {
                prop_assert!(physical.duration <= max_duration * slack);
            }
            if let Some(distance) = physical.min_distance {
                prop_assert!(distance * slack >= device.min_distance());
            }
        }
    }

    #[test]
    fn physical_values_are_monotonic_in_energy(
        metrics in arb_metrics(),
        c6 in 1e4_f64..1e7,
        energy in 0.1_f64..100.0,
        factor in 1.01_f64..5.0,
    ) {
        let low = metrics.physical(&UnitConverter::from_energy(c6, energy).unwrap());
        let high = metrics.physical(&UnitConverter::from_energy(c6, energy * factor).unwrap());

        if metrics.max_amplitude > 0.0 {
            prop_assert!(high.amplitude > low.amplitude);
        }
        prop_assert!(high.duration < low.duration);
        if let (Some(lo), Some(hi)) = (low.min_distance, high.min_distance) {
            prop_assert!(hi < lo);
        }
    }

    #[test]
    fn amplitude_profile_saturates_when_feasible(device in arb_device(), metrics in arb_metrics()) {
        prop_assume!(metrics.max_amplitude > 0.0);
        if let Ok(converter) = select_scale(&CompilerProfile::MaxAmplitude, &metrics, &device) {
            let amplitude = metrics.physical(&converter).amplitude;
            prop_assert!((amplitude - device.max_amplitude()).abs() <= 1e-9 * device.max_amplitude());
        }
    }
}
