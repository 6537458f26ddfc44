//! The handful of program quantities the scale search depends on.

use qool_hal::UnitConverter;
use qool_ir::{Drive, Register};
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};

/// Dimensionless extrema of a program.
///
/// Every bound on the reference energy is a function of these values and
/// the device limits alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgramMetrics {
    /// Number of atoms in the register.
    pub n_atoms: usize,
    /// Smallest pairwise distance; `None` for fewer than two atoms.
    pub min_pairwise_distance: Option<f64>,
    /// Peak drive amplitude.
    pub max_amplitude: f64,
    /// Peak detuning magnitude.
    pub max_abs_detuning: f64,
    /// Total drive duration.
    pub duration: f64,
}

impl ProgramMetrics {
    /// Build metrics from raw values.
    pub fn new(
        n_atoms: usize,
        min_pairwise_distance: Option<f64>,
        max_amplitude: f64,
        max_abs_detuning: f64,
        duration: f64,
    ) -> CompileResult<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(CompileError::InvalidProgram(format!(
                "duration must be positive and finite, got {duration}"
            )));
        }
        if !(max_amplitude.is_finite() && max_amplitude >= 0.0) {
            return Err(CompileError::InvalidProgram(format!(
                "max amplitude must be non-negative, got {max_amplitude}"
            )));
        }
        if !(max_abs_detuning.is_finite() && max_abs_detuning >= 0.0) {
            return Err(CompileError::InvalidProgram(format!(
                "max detuning magnitude must be non-negative, got {max_abs_detuning}"
            )));
        }
        match min_pairwise_distance {
            Some(d) if !(d.is_finite() && d > 0.0) => {
                return Err(CompileError::InvalidProgram(format!(
                    "minimum pairwise distance must be positive, got {d}"
                )));
            }
            Some(_) if n_atoms < 2 => {
                return Err(CompileError::InvalidProgram(format!(
                    "a pairwise distance needs at least two atoms, got {n_atoms}"
                )));
            }
            None if n_atoms >= 2 => {
                return Err(CompileError::InvalidProgram(format!(
                    "{n_atoms} atoms but no minimum pairwise distance"
                )));
            }
            _ => {}
        }

        Ok(Self {
            n_atoms,
            min_pairwise_distance,
            max_amplitude,
            max_abs_detuning,
            duration,
        })
    }

    /// Extract metrics from an already validated register and drive.
    pub fn from_parts(register: &Register, drive: &Drive) -> Self {
        Self {
            n_atoms: register.n_atoms(),
            min_pairwise_distance: register.min_pairwise_distance(),
            max_amplitude: drive.max_amplitude(),
            max_abs_detuning: drive.max_abs_detuning(),
            duration: drive.duration(),
        }
    }

    /// Physical extrema under `converter`.
    pub fn physical(&self, converter: &UnitConverter) -> PhysicalSummary {
        PhysicalSummary {
            amplitude: converter.to_physical_energy(self.max_amplitude),
            abs_detuning: converter.to_physical_energy(self.max_abs_detuning),
            duration: converter.to_physical_time(self.duration),
            min_distance: self
                .min_pairwise_distance
                .map(|d| converter.to_physical_distance(d)),
        }
    }
}

/// Physical extrema of a compiled program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSummary {
    /// Peak amplitude (rad/µs).
    pub amplitude: f64,
    /// Peak detuning magnitude (rad/µs).
    pub abs_detuning: f64,
    /// Duration before clock rounding (ns).
    pub duration: f64,
    /// Smallest interatomic distance (µm).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_distance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use qool_ir::Waveform;

    #[test]
    fn test_from_parts() {
        let register = Register::from_coordinates([[0.0, 0.0], [2.0, 0.0], [0.0, 1.5]]).unwrap();
        let drive = Drive::with_waveforms(
            Waveform::constant(3.0, 0.7).unwrap(),
            Waveform::ramp(2.0, -1.2, 0.4).unwrap(),
        )
        .unwrap();
        let m = ProgramMetrics::from_parts(&register, &drive);
        assert_eq!(m.n_atoms, 3);
        assert_eq!(m.min_pairwise_distance, Some(1.5));
        assert_eq!(m.max_amplitude, 0.7);
        assert_eq!(m.max_abs_detuning, 1.2);
        assert_eq!(m.duration, 3.0);
    }

    #[test]
    fn test_new_validates() {
        assert!(ProgramMetrics::new(2, Some(1.0), 1.0, 0.0, 1.0).is_ok());
        assert!(ProgramMetrics::new(0, None, 1.0, 0.0, 1.0).is_ok());
        assert!(ProgramMetrics::new(2, Some(1.0), 1.0, 0.0, 0.0).is_err());
        assert!(ProgramMetrics::new(2, Some(0.0), 1.0, 0.0, 1.0).is_err());
        assert!(ProgramMetrics::new(2, Some(1.0), -1.0, 0.0, 1.0).is_err());
        assert!(ProgramMetrics::new(2, None, 1.0, 0.0, 1.0).is_err());
        assert!(ProgramMetrics::new(1, Some(1.0), 1.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_physical_summary() {
        let converter = UnitConverter::from_energy(1000.0, 10.0).unwrap();
        let m = ProgramMetrics::new(2, Some(2.0), 0.5, 0.25, 4.0).unwrap();
        let p = m.physical(&converter);
        assert!((p.amplitude - 5.0).abs() < 1e-9);
        assert!((p.abs_detuning - 2.5).abs() < 1e-9);
        assert!((p.duration - 400.0).abs() < 1e-9);
        assert!((p.min_distance.unwrap() - 2.0 * 100.0_f64.powf(1.0 / 6.0)).abs() < 1e-9);
    }
}
