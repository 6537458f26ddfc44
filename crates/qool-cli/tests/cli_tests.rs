//! CLI command parsing and utility tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`), program and
//! device file loading, and error paths.

// The CLI is a binary crate, so file-handling logic is exercised through
// the underlying crates and clap parsing through mirrored structs.

// ============================================================================
// Program file loading
// ============================================================================

mod program_loading {
    use std::fs;

    use qool_compile::{CompilerProfile, QuantumProgram};
    use qool_hal::Device;
    use qool_ir::{Drive, Register, Waveform};
    use serde::Deserialize;

    /// Equivalent to commands::common::ProgramFile
    #[derive(Deserialize)]
    struct ProgramFile {
        register: Vec<[f64; 2]>,
        #[serde(default)]
        amplitude: Option<Waveform>,
        #[serde(default)]
        detuning: Option<Waveform>,
        #[serde(default)]
        phase: f64,
    }

    fn load(source: &str) -> anyhow::Result<QuantumProgram> {
        let file: ProgramFile = serde_json::from_str(source)?;
        let register = Register::from_coordinates(file.register)?;
        let drive = Drive::new(file.amplitude, file.detuning, file.phase)?;
        Ok(QuantumProgram::new(register, drive))
    }

    const PROGRAM: &str = r#"{
        "register": [[0.0, 0.0], [1.0, 0.0], [0.5, 0.866]],
        "amplitude": {
            "kind": "composite",
            "parts": [
                { "kind": "ramp", "duration": 1.0, "initial": 0.0, "final": 1.0 },
                { "kind": "constant", "duration": 2.0, "value": 1.0 },
                { "kind": "ramp", "duration": 1.0, "initial": 1.0, "final": 0.0 }
            ]
        },
        "detuning": { "kind": "ramp", "duration": 4.0, "initial": -1.0, "final": 1.0 },
        "phase": 0.25
    }"#;

    #[test]
    fn test_load_program_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("program.json");
        fs::write(&path, PROGRAM).unwrap();

        let source = fs::read_to_string(&path).unwrap();
        let program = load(&source).unwrap();
        assert_eq!(program.register().n_atoms(), 3);
        assert!((program.drive().duration() - 4.0).abs() < 1e-12);
        assert_eq!(program.drive().phase(), 0.25);
    }

    #[test]
    fn test_loaded_program_compiles() {
        let mut program = load(PROGRAM).unwrap();
        let device = Device::analog();
        let compiled = program.compile_to(&device, CompilerProfile::Auto).unwrap();
        assert!(compiled.sequence.duration_ns > 0);

        let json = serde_json::to_string_pretty(compiled).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["device"]["name"], "analog");
        assert_eq!(value["profile"], "auto");
    }

    #[test]
    fn test_negative_amplitude_rejected() {
        let source = r#"{
            "register": [[0.0, 0.0]],
            "amplitude": { "kind": "constant", "duration": 1.0, "value": -0.5 }
        }"#;
        assert!(load(source).is_err());
    }

    #[test]
    fn test_coincident_atoms_rejected() {
        let source = r#"{
            "register": [[1.0, 1.0], [1.0, 1.0]],
            "detuning": { "kind": "constant", "duration": 1.0, "value": 0.5 }
        }"#;
        assert!(load(source).is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(load(r#"{"register": [[0.0]]}"#).is_err());
        assert!(load("not json").is_err());
    }
}

// ============================================================================
// Device files and configuration
// ============================================================================

mod device_files {
    use std::fs;

    use qool_hal::{DeviceRegistry, HalError};

    const DEVICES: &str = "\
- name: lab-array
  max_amplitude: 12.566
  max_duration: 4000
  min_distance: 5.0
  interaction_coefficient: 865723.02
  clock_period: 4
- name: wide
  max_amplitude: 6.0
  interaction_coefficient: 5420158.53
";

    #[test]
    fn test_devices_file_extends_presets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.yaml");
        fs::write(&path, DEVICES).unwrap();

        let mut registry = DeviceRegistry::with_presets();
        let presets = registry.len();
        assert_eq!(registry.load_yaml_file(&path).unwrap(), 2);
        assert_eq!(registry.len(), presets + 2);

        let device = registry.get("Lab-Array").unwrap();
        assert_eq!(device.clock_period(), 4.0);
        assert_eq!(registry.get("wide").unwrap().max_duration(), None);
    }

    #[test]
    fn test_unknown_device() {
        let registry = DeviceRegistry::with_presets();
        assert!(matches!(
            registry.get("nonexistent"),
            Err(HalError::UnknownDevice(_))
        ));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "logging:\n  level: info\n  format: json\ndefaults:\n  device: analog\n  profile: auto\n",
        )
        .unwrap();

        let source = fs::read_to_string(&path).unwrap();
        let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(&source).unwrap();
        assert_eq!(value["logging"]["format"].as_str(), Some("json"));
        assert_eq!(value["defaults"]["device"].as_str(), Some("analog"));
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "qool")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[arg(long, global = true)]
        config: Option<String>,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Compile {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            output: Option<String>,
            #[arg(short, long)]
            device: Option<String>,
            #[arg(short, long)]
            profile: Option<String>,
            #[arg(long, conflicts_with = "profile")]
            energy: Option<f64>,
        },
        Feasibility {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            device: Option<String>,
        },
        #[command(group(
            clap::ArgGroup::new("reference")
                .required(true)
                .multiple(false)
                .args(["energy", "time", "distance"])
        ))]
        Units {
            #[arg(short, long)]
            device: Option<String>,
            #[arg(long)]
            energy: Option<f64>,
            #[arg(long)]
            time: Option<f64>,
            #[arg(long)]
            distance: Option<f64>,
        },
        Devices {
            #[arg(long)]
            devices_file: Option<String>,
        },
        Version,
    }

    // --- Compile command ---

    #[test]
    fn test_parse_compile_minimal() {
        let cli = TestCli::try_parse_from(["qool", "compile", "-i", "program.json"]).unwrap();
        match cli.command {
            TestCommands::Compile {
                input,
                output,
                device,
                profile,
                energy,
            } => {
                assert_eq!(input, "program.json");
                assert!(output.is_none());
                assert!(device.is_none());
                assert!(profile.is_none());
                assert!(energy.is_none());
            }
            _ => panic!("Expected Compile command"),
        }
    }

    #[test]
    fn test_parse_compile_with_all_args() {
        let cli = TestCli::try_parse_from([
            "qool",
            "-vv",
            "compile",
            "-i",
            "program.json",
            "-o",
            "compiled.json",
            "-d",
            "analog",
            "-p",
            "max-duration",
            "--config",
            "qool.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some("qool.yaml"));
        match cli.command {
            TestCommands::Compile {
                input,
                output,
                device,
                profile,
                ..
            } => {
                assert_eq!(input, "program.json");
                assert_eq!(output.unwrap(), "compiled.json");
                assert_eq!(device.unwrap(), "analog");
                assert_eq!(profile.unwrap(), "max-duration");
            }
            _ => panic!("Expected Compile command"),
        }
    }

    #[test]
    fn test_parse_compile_energy() {
        let cli =
            TestCli::try_parse_from(["qool", "compile", "-i", "p.json", "--energy", "2.5"])
                .unwrap();
        match cli.command {
            TestCommands::Compile { energy, .. } => assert_eq!(energy, Some(2.5)),
            _ => panic!("Expected Compile command"),
        }
    }

    #[test]
    fn test_parse_compile_energy_conflicts_with_profile() {
        let result = TestCli::try_parse_from([
            "qool", "compile", "-i", "p.json", "-p", "auto", "--energy", "2.5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_compile_missing_input() {
        assert!(TestCli::try_parse_from(["qool", "compile"]).is_err());
    }

    // --- Feasibility command ---

    #[test]
    fn test_parse_feasibility() {
        let cli =
            TestCli::try_parse_from(["qool", "feasibility", "-i", "p.json", "-d", "mock"]).unwrap();
        match cli.command {
            TestCommands::Feasibility { input, device } => {
                assert_eq!(input, "p.json");
                assert_eq!(device.as_deref(), Some("mock"));
            }
            _ => panic!("Expected Feasibility command"),
        }
    }

    // --- Units command ---

    #[test]
    fn test_parse_units_time() {
        let cli = TestCli::try_parse_from(["qool", "units", "--time", "100"]).unwrap();
        match cli.command {
            TestCommands::Units {
                energy,
                time,
                distance,
                ..
            } => {
                assert!(energy.is_none());
                assert_eq!(time, Some(100.0));
                assert!(distance.is_none());
            }
            _ => panic!("Expected Units command"),
        }
    }

    #[test]
    fn test_parse_units_requires_one_reference() {
        assert!(TestCli::try_parse_from(["qool", "units"]).is_err());
        assert!(
            TestCli::try_parse_from(["qool", "units", "--energy", "1", "--distance", "5"])
                .is_err()
        );
    }

    #[test]
    fn test_parse_units_rejects_non_numeric() {
        assert!(TestCli::try_parse_from(["qool", "units", "--energy", "fast"]).is_err());
    }

    // --- Devices and version ---

    #[test]
    fn test_parse_devices_with_file() {
        let cli =
            TestCli::try_parse_from(["qool", "devices", "--devices-file", "lab.yaml"]).unwrap();
        match cli.command {
            TestCommands::Devices { devices_file } => {
                assert_eq!(devices_file.as_deref(), Some("lab.yaml"));
            }
            _ => panic!("Expected Devices command"),
        }
    }

    #[test]
    fn test_parse_version() {
        let cli = TestCli::try_parse_from(["qool", "version"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Version));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(TestCli::try_parse_from(["qool", "run"]).is_err());
    }
}
