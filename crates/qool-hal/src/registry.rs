//! Device registry.
//!
//! The [`DeviceRegistry`] maps device names to descriptions. Built-in
//! presets are registered by [`DeviceRegistry::with_presets`]; additional
//! devices come from YAML files.

use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::device::Device;
use crate::error::{HalError, HalResult};
use crate::spec::DeviceSpec;

/// Central registry of known devices, keyed case-insensitively by name.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: FxHashMap<String, DeviceSpec>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in presets.
    pub fn with_presets() -> Self {
        let mut registry = Self::new();
        for spec in DeviceSpec::presets() {
            registry.devices.insert(spec.name.to_lowercase(), spec);
        }
        registry
    }

    /// Register a device description, replacing any with the same name.
    pub fn register(&mut self, spec: DeviceSpec) -> HalResult<()> {
        spec.validate()?;
        debug!("Registering device: {}", spec.name);
        self.devices.insert(spec.name.to_lowercase(), spec);
        Ok(())
    }

    /// Register every device listed in a YAML file.
    ///
    /// Returns the number of devices loaded. Nothing is registered if any
    /// entry fails validation.
    pub fn load_yaml_file(&mut self, path: impl AsRef<Path>) -> HalResult<usize> {
        let specs = DeviceSpec::list_from_yaml_file(path)?;
        for spec in &specs {
            spec.validate()?;
        }
        let count = specs.len();
        for spec in specs {
            self.register(spec)?;
        }
        Ok(count)
    }

    /// Build the device registered under `name`.
    pub fn get(&self, name: &str) -> HalResult<Device> {
        let spec = self
            .devices
            .get(&name.to_lowercase())
            .ok_or_else(|| HalError::UnknownDevice(name.to_string()))?;
        Device::from_spec(spec.clone())
    }

    /// Description registered under `name`.
    pub fn spec(&self, name: &str) -> Option<&DeviceSpec> {
        self.devices.get(&name.to_lowercase())
    }

    /// Registered device names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.devices.values().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_registered() {
        let registry = DeviceRegistry::with_presets();
        assert_eq!(registry.names(), vec!["analog", "mock", "test-analog"]);
        assert_eq!(registry.get("MOCK").unwrap().name(), "mock");
    }

    #[test]
    fn test_unknown_device() {
        let registry = DeviceRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.get("fresnel"),
            Err(HalError::UnknownDevice(name)) if name == "fresnel"
        ));
    }

    #[test]
    fn test_register_rejects_invalid() {
        let mut registry = DeviceRegistry::new();
        let mut spec = DeviceSpec::mock();
        spec.max_amplitude = f64::NAN;
        assert!(registry.register(spec).is_err());
        assert_eq!(registry.len(), 0);
    }
}
