//! Device capability descriptor with its current unit converter.

use serde::Serialize;
use tracing::debug;

use crate::error::HalResult;
use crate::spec::DeviceSpec;
use crate::units::{UnitConverter, UnitSystem};

/// A validated neutral-atom device.
///
/// Besides its physical limits, a device carries a *current converter*: the
/// scale used when a program is compiled with the default profile. It starts
/// as the default converter (energy scale equal to the maximum amplitude)
/// and can be replaced, but never edited in place.
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    #[serde(flatten)]
    spec: DeviceSpec,
    converter: UnitConverter,
}

impl Device {
    /// Validate a description and build the device.
    pub fn from_spec(spec: DeviceSpec) -> HalResult<Self> {
        spec.validate()?;
        Ok(Self::from_valid_spec(spec))
    }

    /// Ideal prototyping device.
    pub fn mock() -> Self {
        Self::from_valid_spec(DeviceSpec::mock())
    }

    /// Analog QPU envelope.
    pub fn analog() -> Self {
        Self::from_valid_spec(DeviceSpec::analog())
    }

    /// Analog limits with a 1 ns clock and no atom-count limit.
    pub fn test_analog() -> Self {
        Self::from_valid_spec(DeviceSpec::test_analog())
    }

    fn from_valid_spec(spec: DeviceSpec) -> Self {
        let converter = UnitConverter::derived_from_energy(
            UnitSystem {
                time_energy_product: spec.time_energy_product,
            },
            spec.interaction_coefficient,
            spec.max_amplitude,
        );
        Self { spec, converter }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn max_amplitude(&self) -> f64 {
        self.spec.max_amplitude
    }

    pub fn max_abs_detuning(&self) -> Option<f64> {
        self.spec.max_abs_detuning
    }

    pub fn max_duration(&self) -> Option<f64> {
        self.spec.max_duration
    }

    /// Longest sequence the device can play: the largest whole number of
    /// clock periods within `max_duration`.
    pub fn max_sequence_duration(&self) -> Option<f64> {
        let clock = self.spec.clock_period;
        self.spec
            .max_duration
            .map(|max| (max / clock + 1e-9).floor() * clock)
    }

    pub fn min_distance(&self) -> f64 {
        self.spec.min_distance
    }

    /// Interaction coefficient C6.
    pub fn interaction_coefficient(&self) -> f64 {
        self.spec.interaction_coefficient
    }

    pub fn clock_period(&self) -> f64 {
        self.spec.clock_period
    }

    pub fn max_atoms(&self) -> Option<u32> {
        self.spec.max_atoms
    }

    pub fn max_radial_distance(&self) -> Option<f64> {
        self.spec.max_radial_distance
    }

    pub fn unit_system(&self) -> UnitSystem {
        UnitSystem {
            time_energy_product: self.spec.time_energy_product,
        }
    }

    /// The description this device was built from.
    pub fn spec(&self) -> &DeviceSpec {
        &self.spec
    }

    /// The current converter.
    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    /// Converter with the energy scale pinned to the maximum amplitude.
    pub fn default_converter(&self) -> UnitConverter {
        UnitConverter::derived_from_energy(
            self.unit_system(),
            self.spec.interaction_coefficient,
            self.spec.max_amplitude,
        )
    }

    /// Restore the default converter.
    pub fn set_default_converter(&mut self) {
        self.replace(self.default_converter());
    }

    /// Replace the current converter with one fixing the time scale.
    pub fn set_time_unit(&mut self, time: f64) -> HalResult<()> {
        let converter = self
            .unit_system()
            .from_time(self.spec.interaction_coefficient, time)?;
        self.replace(converter);
        Ok(())
    }

    /// Replace the current converter with one fixing the energy scale.
    pub fn set_energy_unit(&mut self, energy: f64) -> HalResult<()> {
        let converter = self
            .unit_system()
            .from_energy(self.spec.interaction_coefficient, energy)?;
        self.replace(converter);
        Ok(())
    }

    /// Replace the current converter with one fixing the distance scale.
    pub fn set_distance_unit(&mut self, distance: f64) -> HalResult<()> {
        let converter = self
            .unit_system()
            .from_distance(self.spec.interaction_coefficient, distance)?;
        self.replace(converter);
        Ok(())
    }

    fn replace(&mut self, converter: UnitConverter) {
        debug!("Device '{}': converter set to {}", self.spec.name, converter);
        self.converter = converter;
    }
}
