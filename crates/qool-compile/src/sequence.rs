//! Physical pulse sequence built from a program and a selected converter.

use qool_hal::{Device, UnitConverter, is_close};
use qool_ir::{AtomId, Drive, Register};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::bounds::{BoundSource, EnergyBound, Infeasibility, Relation};
use crate::error::{CompileError, CompileResult};

/// Largest number of 1 ns samples a sequence may hold (10 ms).
pub const MAX_SEQUENCE_SAMPLES: u64 = 10_000_000;

/// A sampled, device-ready sequence.
///
/// Amplitude and detuning hold one value per nanosecond; the sequence
/// length is a whole number of device clock periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSequence {
    /// Total duration (ns).
    pub duration_ns: u64,
    /// Amplitude samples (rad/µs).
    pub amplitude: Vec<f64>,
    /// Detuning samples (rad/µs).
    pub detuning: Vec<f64>,
    /// Drive phase (rad).
    pub phase: f64,
    /// Atom positions (µm).
    pub coordinates: Vec<(AtomId, [f64; 2])>,
}

impl PhysicalSequence {
    /// Apply `converter` to every quantity of the program.
    #[instrument(skip_all, fields(device = device.name(), atoms = register.n_atoms()))]
    pub fn build(
        register: &Register,
        drive: &Drive,
        converter: &UnitConverter,
        device: &Device,
    ) -> CompileResult<Self> {
        if let Some(max_atoms) = device.max_atoms() {
            if register.n_atoms() > max_atoms as usize {
                return Err(CompileError::RegisterOutOfBounds(format!(
                    "{} atoms exceed the device limit of {}",
                    register.n_atoms(),
                    max_atoms
                )));
            }
        }

        let distance_scale = converter.distance_scale();
        if let Some(max_radial) = device.max_radial_distance() {
            let radial = register.max_radial_distance() * distance_scale;
            if radial > max_radial && !is_close(radial, max_radial) {
                return Err(CompileError::RegisterOutOfBounds(format!(
                    "atom at {radial:.3} µm from the origin exceeds the radial limit of {max_radial} µm"
                )));
            }
        }

        let duration_ns = physical_duration(drive.duration(), converter, device)?;
        let time_scale = converter.time_scale();
        let energy_scale = converter.energy_scale();

        let times: Vec<f64> = (0..duration_ns).map(|t| t as f64 / time_scale).collect();
        let amplitude = drive
            .amplitude()
            .sample(&times)
            .into_iter()
            .map(|v| v * energy_scale)
            .collect();
        let detuning = drive
            .detuning()
            .sample(&times)
            .into_iter()
            .map(|v| v * energy_scale)
            .collect();

        debug!("Built sequence of {} ns", duration_ns);

        Ok(Self {
            duration_ns,
            amplitude,
            detuning,
            phase: drive.phase(),
            coordinates: register.scaled(distance_scale),
        })
    }

    /// Largest amplitude sample.
    pub fn peak_amplitude(&self) -> f64 {
        self.amplitude.iter().copied().fold(0.0, f64::max)
    }

    /// Largest detuning magnitude sample.
    pub fn peak_abs_detuning(&self) -> f64 {
        self.detuning.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }
}

/// Whole nanoseconds covering the program, rounded up to the clock period.
///
/// A sequence that would outlast the device is rejected, never truncated.
fn physical_duration(
    duration: f64,
    converter: &UnitConverter,
    device: &Device,
) -> CompileResult<u64> {
    let raw = converter.to_physical_time(duration);
    let nearest = raw.round();
    let ns = if is_close(raw, nearest) { nearest } else { raw.ceil() };

    let clock = device.clock_period();
    let total = (ns / clock).ceil() * clock;

    if let Some(limit) = device.max_sequence_duration() {
        if total > limit && !is_close(total, limit) {
            let k = converter.unit_system().time_energy_product;
            return Err(CompileError::Infeasible(Infeasibility {
                profile: None,
                selected: EnergyBound {
                    source: BoundSource::Converter,
                    relation: Relation::Exactly,
                    value: converter.energy_scale(),
                },
                violated: EnergyBound::at_least(BoundSource::Duration, duration * k / limit),
            }));
        }
    }

    if !(total.is_finite() && total >= 1.0) {
        return Err(CompileError::InvalidProgram(format!(
            "physical duration {raw} ns cannot be sampled"
        )));
    }
    if total > MAX_SEQUENCE_SAMPLES as f64 {
        return Err(CompileError::SequenceTooLong {
            duration_ns: total,
            limit: MAX_SEQUENCE_SAMPLES,
        });
    }
    Ok(total as u64)
}
