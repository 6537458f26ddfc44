//! Units command implementation.

use anyhow::{Context, Result};
use console::style;

use super::common::resolve_device;
use crate::config::CliConfig;

/// The reference scale pinned on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference {
    Energy(f64),
    Time(f64),
    Distance(f64),
}

impl Reference {
    /// The first scale given, in energy, time, distance order.
    pub fn from_args(energy: Option<f64>, time: Option<f64>, distance: Option<f64>) -> Option<Self> {
        energy
            .map(Self::Energy)
            .or(time.map(Self::Time))
            .or(distance.map(Self::Distance))
    }
}

/// Execute the units command.
pub fn execute(config: &CliConfig, device: Option<&str>, reference: Reference) -> Result<()> {
    let mut device = resolve_device(config, device)?;

    let applied = match reference {
        Reference::Energy(e) => device.set_energy_unit(e),
        Reference::Time(t) => device.set_time_unit(t),
        Reference::Distance(d) => device.set_distance_unit(d),
    };
    applied.with_context(|| format!("Invalid reference scale: {reference:?}"))?;

    let converter = device.converter();
    let (time, energy, distance) = converter.factors();

    println!(
        "{} Units on {} (C6 = {}, K = {})\n",
        style("→").cyan().bold(),
        style(device.name()).yellow(),
        converter.c6(),
        converter.unit_system().time_energy_product
    );
    println!("  Time:     {time:.6} ns");
    println!("  Energy:   {energy:.6} rad/µs");
    println!("  Distance: {distance:.6} µm");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_from_args() {
        assert_eq!(
            Reference::from_args(Some(2.0), None, None),
            Some(Reference::Energy(2.0))
        );
        assert_eq!(
            Reference::from_args(None, None, Some(5.0)),
            Some(Reference::Distance(5.0))
        );
        assert_eq!(Reference::from_args(None, None, None), None);
    }

    #[test]
    fn test_units_rejects_non_positive_scale() {
        let config = CliConfig::default();
        assert!(execute(&config, None, Reference::Time(0.0)).is_err());
        assert!(execute(&config, Some("analog"), Reference::Energy(4.0)).is_ok());
    }
}
