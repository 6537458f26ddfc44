//! Reference-scale selection.
//!
//! [`select_scale`] is the single entry point: it maps a profile, the
//! program metrics and a device to a [`UnitConverter`] whose physical
//! program fits every device limit, or to a typed failure.

use qool_hal::{Device, Quantity, UnitConverter};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::bounds::{EnergyBound, FeasibleInterval, Infeasibility};
use crate::error::{CompileError, CompileResult, from_hal};
use crate::metrics::ProgramMetrics;
use crate::profile::{BisectionConfig, CompilerProfile, CustomProfile, ProfileKind, ScaleObjective};
use crate::solver::bisect;

/// Lower end used for bisection when no duration limit bounds the energy
/// from below, as a fraction of the upper end.
const OPEN_LOWER_FRACTION: f64 = 1e-9;

/// Outcome of a scale selection, with the reasoning behind it.
#[derive(Debug, Clone, Serialize)]
pub struct ScaleSelection {
    /// Selected converter.
    pub converter: UnitConverter,
    /// Every bound that applied.
    pub interval: FeasibleInterval,
    /// The bound or pin that fixed the energy.
    pub limiting: EnergyBound,
}

/// Select the converter for `metrics` on `device` under `profile`.
pub fn select_scale(
    profile: &CompilerProfile,
    metrics: &ProgramMetrics,
    device: &Device,
) -> CompileResult<UnitConverter> {
    select_scale_detailed(profile, metrics, device).map(|s| s.converter)
}

/// Like [`select_scale`], also returning the interval and limiting bound.
#[instrument(skip(profile, metrics, device), fields(profile = %profile.kind(), device = device.name()))]
pub fn select_scale_detailed(
    profile: &CompilerProfile,
    metrics: &ProgramMetrics,
    device: &Device,
) -> CompileResult<ScaleSelection> {
    let kind = profile.kind();
    let interval = FeasibleInterval::from_constraints(metrics, device);
    debug!("Feasible interval: {}", interval);

    let limiting = match profile {
        CompilerProfile::Default => EnergyBound::pinned(kind, device.converter().energy_scale()),
        CompilerProfile::MaxAmplitude => {
            if metrics.max_amplitude <= 0.0 {
                return Err(CompileError::InvalidScale {
                    quantity: Quantity::Energy,
                    value: f64::INFINITY,
                });
            }
            EnergyBound::pinned(kind, device.max_amplitude() / metrics.max_amplitude)
        }
        CompilerProfile::MinDistance => {
            if device.min_distance() <= 0.0 {
                return Err(CompileError::MissingCapability {
                    profile: kind,
                    capability: "min_distance",
                });
            }
            // Without a pair of atoms, unit distance maps onto the limit.
            let d = metrics.min_pairwise_distance.unwrap_or(1.0);
            let ratio = d / device.min_distance();
            EnergyBound::pinned(kind, device.interaction_coefficient() * ratio.powi(6))
        }
        CompilerProfile::MaxDuration => {
            let max_duration =
                device
                    .max_sequence_duration()
                    .ok_or(CompileError::MissingCapability {
                        profile: kind,
                        capability: "max_duration",
                    })?;
            let k = device.unit_system().time_energy_product;
            EnergyBound::pinned(kind, metrics.duration * k / max_duration)
        }
        CompilerProfile::Auto => auto_energy(&interval, device)?,
        CompilerProfile::Custom(CustomProfile::FixedEnergy(energy)) => {
            EnergyBound::pinned(kind, *energy)
        }
        CompilerProfile::Custom(CustomProfile::Objective { objective, solver }) => {
            solve_objective(objective.as_ref(), solver, &interval, metrics, device)?
        }
    };

    let converter = match profile {
        CompilerProfile::Default => *device.converter(),
        _ => device
            .unit_system()
            .from_energy(device.interaction_coefficient(), limiting.value)
            .map_err(from_hal)?,
    };
    let energy = converter.energy_scale();

    if let Some(violated) = interval.first_violation(energy) {
        return Err(CompileError::Infeasible(Infeasibility {
            profile: Some(kind),
            selected: EnergyBound::pinned(kind, energy),
            violated: *violated,
        }));
    }

    info!(
        "Selected energy scale {:.6} ({}) for device '{}'",
        energy,
        limiting.source,
        device.name()
    );

    Ok(ScaleSelection {
        converter,
        interval,
        limiting,
    })
}

/// Supremum of the feasible interval.
///
/// With no upper bound the device's current energy is kept, raised to the
/// lower bound when it falls below it.
fn auto_energy(interval: &FeasibleInterval, device: &Device) -> CompileResult<EnergyBound> {
    if let Some(conflict) = interval.conflict() {
        return Err(CompileError::Infeasible(Infeasibility {
            profile: Some(ProfileKind::Auto),
            ..conflict
        }));
    }

    if let Some(upper) = interval.upper() {
        return Ok(*upper);
    }

    let current = device.converter().energy_scale();
    match interval.lower() {
        Some(lower) if lower.value > current => Ok(*lower),
        _ => Ok(EnergyBound::pinned(ProfileKind::Auto, current)),
    }
}

fn solve_objective(
    objective: &dyn ScaleObjective,
    solver: &BisectionConfig,
    interval: &FeasibleInterval,
    metrics: &ProgramMetrics,
    device: &Device,
) -> CompileResult<EnergyBound> {
    if let Some(conflict) = interval.conflict() {
        return Err(CompileError::Infeasible(Infeasibility {
            profile: Some(ProfileKind::Custom),
            ..conflict
        }));
    }
    let upper = interval
        .upper()
        .ok_or(CompileError::UnboundedInterval(ProfileKind::Custom))?
        .value;
    let lower = interval
        .lower()
        .map_or(upper * OPEN_LOWER_FRACTION, |b| b.value);

    debug!(
        "Solving objective '{}' on [{:.6}, {:.6}]",
        objective.name(),
        lower,
        upper
    );
    let energy = bisect(
        objective.name(),
        |e| objective.residual(e, metrics, device),
        lower,
        upper,
        solver,
    )?;
    Ok(EnergyBound::pinned(ProfileKind::Custom, energy))
}
