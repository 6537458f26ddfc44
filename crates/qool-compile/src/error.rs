//! Error types for the compilation engine.

use qool_hal::{HalError, Quantity};
use thiserror::Error;

use crate::bounds::Infeasibility;
use crate::profile::ProfileKind;

/// Errors that can occur while compiling a program to a device.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The selected reference scale is non-positive or non-finite.
    #[error("Invalid {quantity} scale: {value}")]
    InvalidScale {
        /// Quantity whose scale is invalid.
        quantity: Quantity,
        /// Offending value.
        value: f64,
    },

    /// No reference energy satisfies every device bound.
    #[error("Infeasible compilation: {0}")]
    Infeasible(Infeasibility),

    /// The profile needs a device limit the device does not define.
    #[error("Profile '{profile}' requires device capability '{capability}'")]
    MissingCapability {
        /// Requested profile.
        profile: ProfileKind,
        /// Name of the missing limit.
        capability: &'static str,
    },

    /// Program metrics are malformed.
    #[error("Invalid program: {0}")]
    InvalidProgram(String),

    /// The objective residual has the same sign at both interval ends.
    #[error("Objective '{objective}' has no sign change on [{lower}, {upper}]")]
    NoBracket {
        /// Objective name.
        objective: String,
        /// Lower end of the searched interval.
        lower: f64,
        /// Upper end of the searched interval.
        upper: f64,
    },

    /// Bisection hit its iteration cap.
    #[error("Objective '{objective}' did not converge after {iterations} iterations (last bracket [{lower}, {upper}])")]
    NonConvergence {
        /// Objective name.
        objective: String,
        /// Iterations performed.
        iterations: usize,
        /// Lower end of the last bracket.
        lower: f64,
        /// Upper end of the last bracket.
        upper: f64,
    },

    /// The profile needs a bounded feasible interval.
    #[error("Profile '{0}' needs an upper bound on the reference energy, but none applies")]
    UnboundedInterval(ProfileKind),

    /// The sampled sequence would exceed the sample cap.
    #[error("Sequence of {duration_ns} ns exceeds the limit of {limit} samples")]
    SequenceTooLong {
        /// Physical duration after clock rounding (ns).
        duration_ns: f64,
        /// Largest number of 1 ns samples a sequence may hold.
        limit: u64,
    },

    /// The physical register does not fit the device.
    #[error("Register out of bounds: {0}")]
    RegisterOutOfBounds(String),

    /// A compiled result was requested before compiling.
    #[error("Program has not been compiled")]
    NotCompiled,

    /// Hardware description error.
    #[error(transparent)]
    Hal(#[from] HalError),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Lift converter construction failures into compile errors, keeping
/// invalid scales as first-class variants.
pub(crate) fn from_hal(err: HalError) -> CompileError {
    match err {
        HalError::InvalidScale { quantity, value } => CompileError::InvalidScale { quantity, value },
        other => CompileError::Hal(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_scale_is_lifted() {
        let err = from_hal(HalError::InvalidScale {
            quantity: Quantity::Energy,
            value: 0.0,
        });
        assert!(matches!(err, CompileError::InvalidScale { value, .. } if value == 0.0));

        let err = from_hal(HalError::UnknownDevice("x".into()));
        assert!(matches!(err, CompileError::Hal(_)));
    }

    #[test]
    fn test_error_display() {
        let err = CompileError::MissingCapability {
            profile: ProfileKind::MaxDuration,
            capability: "max_duration",
        };
        assert_eq!(
            err.to_string(),
            "Profile 'max-duration' requires device capability 'max_duration'"
        );
        let err = CompileError::SequenceTooLong {
            duration_ns: 2e7,
            limit: 10_000_000,
        };
        assert_eq!(
            err.to_string(),
            "Sequence of 20000000 ns exceeds the limit of 10000000 samples"
        );
        assert_eq!(
            CompileError::NotCompiled.to_string(),
            "Program has not been compiled"
        );
    }
}
