//! Compile command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;

use super::common::{load_program, parse_profile, resolve_device};
use crate::config::CliConfig;

/// Execute the compile command.
pub fn execute(
    config: &CliConfig,
    input: &str,
    output: Option<&str>,
    device: Option<&str>,
    profile: Option<&str>,
    energy: Option<f64>,
) -> Result<()> {
    let device = resolve_device(config, device)?;
    let profile = parse_profile(profile.unwrap_or(&config.defaults.profile), energy)?;

    println!(
        "{} Compiling {} for device {} ({} profile)",
        style("→").cyan().bold(),
        style(input).green(),
        style(device.name()).yellow(),
        profile.kind()
    );

    let mut program = load_program(input)?;
    let metrics = program.metrics();
    println!(
        "  Loaded: {} atoms, duration {:.4}, peak amplitude {:.4}",
        metrics.n_atoms, metrics.duration, metrics.max_amplitude
    );

    let compiled = program
        .compile_to(&device, profile)
        .with_context(|| format!("Compilation for '{}' failed", device.name()))?;

    println!("{} Compilation complete", style("✓").green().bold());
    println!("  {}", compiled.converter);

    let summary = &compiled.summary;
    println!("  Amplitude:  {:.4} rad/µs", summary.amplitude);
    println!("  Detuning:   {:.4} rad/µs", summary.abs_detuning);
    match summary.min_distance {
        Some(distance) => println!("  Spacing:    {distance:.4} µm"),
        None => println!("  Spacing:    {}", style("n/a").dim()),
    }
    println!(
        "  Duration:   {} ns ({} samples)",
        compiled.sequence.duration_ns,
        compiled.sequence.amplitude.len()
    );

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(compiled)
            .context("Failed to serialize compiled program")?;
        fs::write(path, json).with_context(|| format!("Failed to write file: {path}"))?;
        println!("  Output: {}", style(path).green());
    }

    Ok(())
}
