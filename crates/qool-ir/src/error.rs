//! Error types for the IR crate.

use crate::register::AtomId;
use thiserror::Error;

/// Errors that can occur while building a dimensionless program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Atom id appears more than once in a register.
    #[error("Duplicate atom {0} in register")]
    DuplicateAtom(AtomId),

    /// Two atoms share the same position.
    #[error("Atoms {first} and {second} are coincident")]
    CoincidentAtoms {
        /// First atom of the pair.
        first: AtomId,
        /// Second atom of the pair.
        second: AtomId,
    },

    /// A coordinate is NaN or infinite.
    #[error("Atom {0} has a non-finite coordinate")]
    NonFiniteCoordinate(AtomId),

    /// Waveform duration is zero, negative or non-finite.
    #[error("Waveform duration must be a positive finite value, got {0}")]
    InvalidDuration(f64),

    /// A waveform value is NaN or infinite.
    #[error("Waveform value must be finite, got {0}")]
    NonFiniteValue(f64),

    /// Composite waveform without parts.
    #[error("A composite waveform needs at least one part")]
    EmptyComposite,

    /// Piecewise-linear shape mismatch.
    #[error("Piecewise linear waveform needs N >= 2 durations and N + 1 values, got {durations} and {values}")]
    PiecewiseShape {
        /// Number of durations supplied.
        durations: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// Neither amplitude nor detuning was given.
    #[error("Amplitude and detuning cannot both be empty")]
    EmptyDrive,

    /// Amplitude waveform dips below zero.
    #[error("Amplitude must be non-negative, minimum is {0}")]
    NegativeAmplitude(f64),

    /// Drive phase is not finite.
    #[error("Drive phase must be finite, got {0}")]
    InvalidPhase(f64),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IrError::CoincidentAtoms {
            first: AtomId(0),
            second: AtomId(3),
        };
        assert_eq!(err.to_string(), "Atoms a0 and a3 are coincident");

        let err = IrError::PiecewiseShape {
            durations: 2,
            values: 2,
        };
        assert!(err.to_string().contains("got 2 and 2"));
    }
}
