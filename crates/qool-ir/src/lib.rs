//! Qool Dimensionless Program Representation
//!
//! This crate holds the hardware-independent description of an analog
//! neutral-atom program: where the atoms sit and how they are driven, both in
//! unit-free ratios. It is the input side of the Qool compilation stack; the
//! `qool-compile` crate maps these quantities onto a concrete device.
//!
//! # Core Components
//!
//! - [`Register`] / [`AtomId`]: atoms at dimensionless 2D coordinates
//! - [`Waveform`]: piecewise-linear waveforms with exact extrema
//! - [`Drive`]: amplitude and detuning waveforms sharing one duration
//!
//! # Example
//!
//! ```rust
//! use qool_ir::{Drive, Register, Waveform};
//!
//! let register = Register::from_coordinates([[0.0, 0.0], [1.0, 0.0], [0.5, 0.8]]).unwrap();
//! let amplitude = Waveform::piecewise_linear(&[1.0, 2.0, 1.0], &[0.0, 1.0, 1.0, 0.0]).unwrap();
//! let detuning = Waveform::ramp(4.0, -1.0, 1.0).unwrap();
//! let drive = Drive::with_waveforms(amplitude, detuning).unwrap();
//!
//! assert_eq!(register.n_atoms(), 3);
//! assert!((drive.duration() - 4.0).abs() < 1e-12);
//! assert_eq!(drive.max_amplitude(), 1.0);
//! ```

pub mod drive;
pub mod error;
pub mod register;
pub mod waveform;

pub use drive::{Drive, DriveSpec};
pub use error::{IrError, IrResult};
pub use register::{AtomId, Register};
pub use waveform::Waveform;
