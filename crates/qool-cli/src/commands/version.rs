//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - physical unit scaling for neutral-atom programs",
        style("Qool").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qool-ir       Dimensionless program representation");
    println!("  qool-hal      Unit converter and device descriptions");
    println!("  qool-compile  Reference-scale selection and sequence building");
    println!("  qool-cli      Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style(env!("CARGO_PKG_REPOSITORY")).underlined()
    );
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
