//! Error types for the HAL crate.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Physical quantity named in scale errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Time scale.
    Time,
    /// Energy scale (amplitude and detuning).
    Energy,
    /// Distance scale.
    Distance,
    /// Interaction coefficient C6.
    InteractionCoefficient,
    /// Constant product of time and energy scales.
    TimeEnergyProduct,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Time => "time",
            Self::Energy => "energy",
            Self::Distance => "distance",
            Self::InteractionCoefficient => "interaction coefficient",
            Self::TimeEnergyProduct => "time-energy product",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// A scale would be non-positive or non-finite.
    #[error("Invalid {quantity} scale: {value}")]
    InvalidScale {
        /// Quantity whose scale is invalid.
        quantity: Quantity,
        /// Offending value.
        value: f64,
    },

    /// A set of factors breaks the time-energy or energy-distance invariant.
    #[error("Invalid set of factors: {0}")]
    InvariantViolated(String),

    /// Device description is inconsistent.
    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    /// No device registered under this name.
    #[error("Unknown device: '{0}'")]
    UnknownDevice(String),

    /// File could not be read.
    #[error("IO error: {0}")]
    Io(String),

    /// Device description could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
