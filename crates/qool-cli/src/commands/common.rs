//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use qool_compile::{CompilerProfile, MarginBalance, ProfileKind, QuantumProgram};
use qool_hal::{Device, DeviceRegistry};
use qool_ir::{Drive, Register, Waveform};

use crate::config::{CliConfig, MARGIN_BALANCE};

/// On-disk JSON form of a dimensionless program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramFile {
    /// Atom coordinates; atom `i` is named `a{i}`.
    pub register: Vec<[f64; 2]>,
    #[serde(default)]
    pub amplitude: Option<Waveform>,
    #[serde(default)]
    pub detuning: Option<Waveform>,
    #[serde(default)]
    pub phase: f64,
}

impl ProgramFile {
    /// Build the program this file describes.
    pub fn into_program(self) -> Result<QuantumProgram> {
        let register =
            Register::from_coordinates(self.register).context("Invalid register")?;
        let drive =
            Drive::new(self.amplitude, self.detuning, self.phase).context("Invalid drive")?;
        Ok(QuantumProgram::new(register, drive))
    }
}

/// Load a program from a JSON file.
pub fn load_program(path: &str) -> Result<QuantumProgram> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    let file: ProgramFile = serde_json::from_str(&source)
        .with_context(|| format!("Failed to parse program: {path}"))?;
    file.into_program()
}

/// Registry with the built-in presets plus any devices from `devices_file`.
pub fn build_registry(devices_file: Option<&str>) -> Result<DeviceRegistry> {
    let mut registry = DeviceRegistry::with_presets();
    if let Some(path) = devices_file {
        let count = registry
            .load_yaml_file(path)
            .with_context(|| format!("Failed to load devices from {path}"))?;
        tracing::info!("Loaded {} device(s) from {}", count, path);
    }
    Ok(registry)
}

/// Look up the requested device, falling back to the configured default.
pub fn resolve_device(config: &CliConfig, device: Option<&str>) -> Result<Device> {
    let registry = build_registry(config.devices_file.as_deref())?;
    let name = device.unwrap_or(&config.defaults.device);
    registry.get(name).map_err(|e| {
        anyhow::anyhow!("{e}. Available: {}", registry.names().join(", "))
    })
}

/// Parse a profile name; `energy` pins a custom fixed energy.
pub fn parse_profile(name: &str, energy: Option<f64>) -> Result<CompilerProfile> {
    if let Some(energy) = energy {
        if !(energy.is_finite() && energy > 0.0) {
            anyhow::bail!("Energy must be a positive finite value, got {energy}");
        }
        return Ok(CompilerProfile::fixed_energy(energy));
    }

    if name.trim().eq_ignore_ascii_case(MARGIN_BALANCE) {
        return Ok(CompilerProfile::objective(MarginBalance));
    }

    let kind: ProfileKind = name.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    CompilerProfile::from_kind(kind).ok_or_else(|| {
        anyhow::anyhow!("The custom profile needs --energy, or use '{MARGIN_BALANCE}'")
    })
}
