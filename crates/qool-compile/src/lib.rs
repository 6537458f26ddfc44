//! Qool Compilation Engine
//!
//! This crate maps a dimensionless neutral-atom program onto the physical
//! envelope of a device. The whole mapping is fixed by one scalar, the
//! reference energy `E`: amplitudes scale with `E`, durations with `1/E` and
//! distances with `E^(-1/6)`. Compiling means choosing `E`.
//!
//! # Overview
//!
//! ```text
//! Register + Drive
//!       │
//!       ▼
//! ProgramMetrics ──► FeasibleInterval (one bound per device limit)
//!       │                   │
//!       ▼                   ▼
//!  CompilerProfile ──► select_scale ──► UnitConverter
//!                                            │
//!                                            ▼
//!                                    PhysicalSequence
//! ```
//!
//! # Profiles
//!
//! | Profile          | Reference energy                                   |
//! |------------------|----------------------------------------------------|
//! | `default`        | the device's current converter                     |
//! | `max-amplitude`  | saturates the amplitude limit                      |
//! | `min-distance`   | closest pair sits exactly at the spacing limit     |
//! | `max-duration`   | program stretched to the duration limit            |
//! | `auto`           | largest energy inside the feasible interval        |
//! | `custom`         | a fixed energy, or the root of a [`ScaleObjective`] |
//!
//! Every profile's choice is checked against every bound; a violation is a
//! [`CompileError::Infeasible`] naming both sides of the conflict.
//!
//! # Example
//!
//! ```rust
//! use qool_compile::{CompilerProfile, QuantumProgram};
//! use qool_hal::Device;
//! use qool_ir::{Drive, Register, Waveform};
//!
//! let register = Register::from_coordinates([[0.0, 0.0], [1.0, 0.0]]).unwrap();
//! let drive = Drive::from_amplitude(Waveform::constant(1.0, 0.5).unwrap()).unwrap();
//! let mut program = QuantumProgram::new(register, drive);
//!
//! let device = Device::mock();
//! let compiled = program.compile_to(&device, CompilerProfile::Auto).unwrap();
//! assert!(compiled.summary.amplitude <= device.max_amplitude() * (1.0 + 1e-9));
//! ```

pub mod bounds;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod profile;
pub mod program;
pub mod sequence;
pub mod solver;

pub use bounds::{BoundSource, EnergyBound, FeasibleInterval, Infeasibility, Relation};
pub use engine::{ScaleSelection, select_scale, select_scale_detailed};
pub use error::{CompileError, CompileResult};
pub use metrics::{PhysicalSummary, ProgramMetrics};
pub use profile::{
    BisectionConfig, CompilerProfile, CustomProfile, MarginBalance, ProfileKind, ScaleObjective,
};
pub use program::{CompiledProgram, QuantumProgram};
pub use sequence::{MAX_SEQUENCE_SAMPLES, PhysicalSequence};
