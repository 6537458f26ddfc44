//! Qool Command-Line Interface
//!
//! The main entry point for the `qool` tool: compile dimensionless
//! neutral-atom programs to physical units on a chosen device.
//!
//! ```text
//!   program.json ──► qool compile -d analog -p auto ──► compiled.json
//!                         │
//!                         └── qool feasibility: bounds on the reference energy
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::units::Reference;
use commands::{compile, devices, feasibility, units, version};
use config::CliConfig;

/// Qool - physical unit scaling for neutral-atom quantum programs
#[derive(Parser)]
#[command(name = "qool")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a dimensionless program for a device
    Compile {
        /// Input program (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file for the compiled program (JSON)
        #[arg(short, long)]
        output: Option<String>,

        /// Target device (mock, analog, test-analog, or from a devices file)
        #[arg(short, long)]
        device: Option<String>,

        /// Compiler profile (default, max-amplitude, min-distance, max-duration, auto, margin-balance)
        #[arg(short, long)]
        profile: Option<String>,

        /// Pin the reference energy (rad/µs) instead of using a profile
        #[arg(long, conflicts_with = "profile")]
        energy: Option<f64>,
    },

    /// Show the energy bounds a program places on a device
    Feasibility {
        /// Input program (JSON)
        #[arg(short, long)]
        input: String,

        /// Target device
        #[arg(short, long)]
        device: Option<String>,
    },

    /// Show the unit converter for a reference scale
    #[command(group(
        clap::ArgGroup::new("reference")
            .required(true)
            .multiple(false)
            .args(["energy", "time", "distance"])
    ))]
    Units {
        /// Target device
        #[arg(short, long)]
        device: Option<String>,

        /// Reference energy (rad/µs)
        #[arg(long)]
        energy: Option<f64>,

        /// Reference time (ns)
        #[arg(long)]
        time: Option<f64>,

        /// Reference distance (µm)
        #[arg(long)]
        distance: Option<f64>,
    },

    /// List available devices
    Devices {
        /// Additional device descriptions (YAML)
        #[arg(long)]
        devices_file: Option<String>,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: u8, config: &CliConfig) {
    let filter = match verbose {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    init_logging(cli.verbose, &config);

    let result = match cli.command {
        Commands::Compile {
            input,
            output,
            device,
            profile,
            energy,
        } => compile::execute(
            &config,
            &input,
            output.as_deref(),
            device.as_deref(),
            profile.as_deref(),
            energy,
        ),

        Commands::Feasibility { input, device } => {
            feasibility::execute(&config, &input, device.as_deref())
        }

        Commands::Units {
            device,
            energy,
            time,
            distance,
        } => match Reference::from_args(energy, time, distance) {
            Some(reference) => units::execute(&config, device.as_deref(), reference),
            None => Err(anyhow::anyhow!(
                "One of --energy, --time or --distance is required"
            )),
        },

        Commands::Devices { devices_file } => devices::execute(&config, devices_file.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
