//! Devices command implementation.

use anyhow::Result;
use console::style;

use super::common::build_registry;
use crate::config::CliConfig;

/// Execute the devices command.
pub fn execute(config: &CliConfig, devices_file: Option<&str>) -> Result<()> {
    let registry = build_registry(devices_file.or(config.devices_file.as_deref()))?;

    println!("{} Available devices:\n", style("Qool").cyan().bold());

    for name in registry.names() {
        let Some(spec) = registry.spec(name) else {
            continue;
        };
        let marker = if name.eq_ignore_ascii_case(&config.defaults.device) {
            style("●").green()
        } else {
            style("○").dim()
        };

        println!("  {} {}", marker, style(&spec.name).bold());
        println!("    Max amplitude:  {} rad/µs", spec.max_amplitude);
        if let Some(max_det) = spec.max_abs_detuning {
            println!("    Max detuning:   {max_det} rad/µs");
        }
        match spec.max_duration {
            Some(max_dur) => println!("    Max duration:   {max_dur} ns"),
            None => println!("    Max duration:   {}", style("unlimited").dim()),
        }
        println!("    Min distance:   {} µm", spec.min_distance);
        println!("    C6:             {} rad/µs·µm⁶", spec.interaction_coefficient);
        if let Some(max_atoms) = spec.max_atoms {
            println!("    Max atoms:      {max_atoms}");
        }
        println!();
    }

    Ok(())
}
