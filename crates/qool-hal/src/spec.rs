//! Serializable device descriptions.
//!
//! A [`DeviceSpec`] is the plain-data form of a [`Device`](crate::Device):
//! it can be read from YAML or JSON, edited, and turned into a validated
//! device with [`Device::from_spec`](crate::Device::from_spec).
//!
//! ```yaml
//! - name: lab-array
//!   max_amplitude: 12.566
//!   max_duration: 4000
//!   min_distance: 5.0
//!   interaction_coefficient: 865723.02
//!   clock_period: 4
//! ```

use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};
use crate::units::DEFAULT_TIME_ENERGY_PRODUCT;

/// Capability description of a neutral-atom device, in physical units.
///
/// Limits that a device does not impose are `None` and stay `None`; no
/// field is silently filled in with a guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSpec {
    /// Device name, used as the registry key.
    pub name: String,
    /// Maximum Rabi frequency (rad/µs).
    pub max_amplitude: f64,
    /// Maximum absolute detuning (rad/µs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_abs_detuning: Option<f64>,
    /// Maximum sequence duration (ns).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<f64>,
    /// Minimum distance between two atoms (µm). Zero means unconstrained.
    #[serde(default)]
    pub min_distance: f64,
    /// Rydberg interaction coefficient C6 (rad/µs · µm⁶).
    pub interaction_coefficient: f64,
    /// Clock period (ns); sequence durations are multiples of it.
    #[serde(default = "default_clock_period")]
    pub clock_period: f64,
    /// Maximum number of atoms in a register.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_atoms: Option<u32>,
    /// Maximum distance of any atom from the register origin (µm).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_radial_distance: Option<f64>,
    /// Time-energy product of the unit system.
    #[serde(default = "default_time_energy_product")]
    pub time_energy_product: f64,
}

fn default_clock_period() -> f64 {
    1.0
}

fn default_time_energy_product() -> f64 {
    DEFAULT_TIME_ENERGY_PRODUCT
}

impl DeviceSpec {
    /// Ideal device for prototyping: generous limits, 1 ns clock.
    pub fn mock() -> Self {
        Self {
            name: "mock".into(),
            max_amplitude: 4.0 * PI,
            max_abs_detuning: Some(4.0 * PI),
            max_duration: Some(6000.0),
            min_distance: 4.0,
            interaction_coefficient: 5_420_158.53,
            clock_period: 1.0,
            max_atoms: None,
            max_radial_distance: None,
            time_energy_product: DEFAULT_TIME_ENERGY_PRODUCT,
        }
    }

    /// Analog QPU envelope.
    pub fn analog() -> Self {
        Self {
            name: "analog".into(),
            max_amplitude: 4.0 * PI,
            max_abs_detuning: Some(40.0 * PI),
            max_duration: Some(6000.0),
            min_distance: 5.0,
            interaction_coefficient: 865_723.02,
            clock_period: 4.0,
            max_atoms: Some(25),
            max_radial_distance: Some(35.0),
            time_energy_product: DEFAULT_TIME_ENERGY_PRODUCT,
        }
    }

    /// Analog limits with a 1 ns clock and no atom-count limit.
    pub fn test_analog() -> Self {
        Self {
            name: "test-analog".into(),
            clock_period: 1.0,
            max_atoms: None,
            ..Self::analog()
        }
    }

    /// All built-in device descriptions.
    pub fn presets() -> Vec<Self> {
        vec![Self::mock(), Self::analog(), Self::test_analog()]
    }

    /// Parse a single device description from YAML.
    pub fn from_yaml_str(yaml: &str) -> HalResult<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| HalError::Parse(e.to_string()))
    }

    /// Parse a YAML list of device descriptions.
    pub fn list_from_yaml_str(yaml: &str) -> HalResult<Vec<Self>> {
        serde_yaml_ng::from_str(yaml).map_err(|e| HalError::Parse(e.to_string()))
    }

    /// Read a single device description from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> HalResult<Self> {
        Self::from_yaml_str(&read(path.as_ref())?)
    }

    /// Read a YAML list of device descriptions from a file.
    pub fn list_from_yaml_file(path: impl AsRef<Path>) -> HalResult<Vec<Self>> {
        Self::list_from_yaml_str(&read(path.as_ref())?)
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> HalResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| HalError::Parse(e.to_string()))
    }

    /// Check every limit is physically meaningful.
    pub fn validate(&self) -> HalResult<()> {
        let invalid = |msg: String| Err(HalError::InvalidDevice(format!("{}: {msg}", self.name)));

        if self.name.trim().is_empty() {
            return Err(HalError::InvalidDevice("device name is empty".into()));
        }
        if !positive(self.max_amplitude) {
            return invalid(format!("max_amplitude must be > 0, got {}", self.max_amplitude));
        }
        if !positive(self.interaction_coefficient) {
            return invalid(format!(
                "interaction_coefficient must be > 0, got {}",
                self.interaction_coefficient
            ));
        }
        if !(self.min_distance.is_finite() && self.min_distance >= 0.0) {
            return invalid(format!("min_distance must be >= 0, got {}", self.min_distance));
        }
        if !(self.clock_period.is_finite() && self.clock_period >= 1.0) {
            return invalid(format!("clock_period must be >= 1 ns, got {}", self.clock_period));
        }
        if !positive(self.time_energy_product) {
            return invalid(format!(
                "time_energy_product must be > 0, got {}",
                self.time_energy_product
            ));
        }
        if let Some(v) = self.max_abs_detuning.filter(|v| !positive(*v)) {
            return invalid(format!("max_abs_detuning must be > 0, got {v}"));
        }
        if let Some(v) = self.max_duration.filter(|v| !positive(*v)) {
            return invalid(format!("max_duration must be > 0, got {v}"));
        }
        if let Some(v) = self.max_duration.filter(|v| *v < self.clock_period) {
            return invalid(format!(
                "max_duration {v} is shorter than one clock period ({})",
                self.clock_period
            ));
        }
        if let Some(v) = self.max_radial_distance.filter(|v| !positive(*v)) {
            return invalid(format!("max_radial_distance must be > 0, got {v}"));
        }
        if self.max_atoms == Some(0) {
            return invalid("max_atoms must be at least 1".into());
        }
        Ok(())
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn read(path: &Path) -> HalResult<String> {
    std::fs::read_to_string(path).map_err(|e| HalError::Io(format!("{}: {e}", path.display())))
}
