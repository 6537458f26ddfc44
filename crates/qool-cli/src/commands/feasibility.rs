//! Feasibility command implementation.

use anyhow::Result;
use console::style;

use qool_compile::{CompileError, CompilerProfile, FeasibleInterval, select_scale_detailed};

use super::common::{load_program, resolve_device};
use crate::config::CliConfig;

/// Execute the feasibility command.
pub fn execute(config: &CliConfig, input: &str, device: Option<&str>) -> Result<()> {
    let device = resolve_device(config, device)?;
    let program = load_program(input)?;
    let metrics = program.metrics();

    println!(
        "{} Feasibility of {} on {}\n",
        style("→").cyan().bold(),
        style(input).green(),
        style(device.name()).yellow()
    );

    let interval = FeasibleInterval::from_constraints(&metrics, &device);
    if interval.bounds().is_empty() {
        println!("  No device limit constrains the reference energy");
    }
    for bound in interval.bounds() {
        println!("  {} {}", style("•").dim(), bound);
    }
    println!("  Interval: E ∈ {interval}\n");

    match select_scale_detailed(&CompilerProfile::Auto, &metrics, &device) {
        Ok(selection) => {
            println!(
                "{} Auto energy {:.6} (limited by {})",
                style("✓").green().bold(),
                selection.converter.energy_scale(),
                selection.limiting.source
            );
            println!("  {}", selection.converter);
            Ok(())
        }
        Err(CompileError::Infeasible(conflict)) => {
            println!("{} No feasible energy", style("✗").red().bold());
            println!("  {}", conflict.selected);
            println!("  {}", conflict.violated);
            anyhow::bail!("Program does not fit device '{}'", device.name())
        }
        Err(other) => Err(other.into()),
    }
}
