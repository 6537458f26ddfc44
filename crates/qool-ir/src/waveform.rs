//! Dimensionless time-dependent waveforms.
//!
//! Every waveform is piecewise linear, so its extrema over `[0, duration]`
//! are attained at segment endpoints and can be computed exactly. The
//! compiler only ever needs the duration and the extrema; evaluation is
//! used when sampling the physical sequence.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// A waveform over dimensionless time.
///
/// Outside `[0, duration]` every waveform evaluates to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Waveform {
    /// Zero for the whole duration.
    Delay {
        /// Duration of the waveform.
        duration: f64,
    },
    /// A constant value.
    Constant {
        /// Duration of the waveform.
        duration: f64,
        /// Value held for the whole duration.
        value: f64,
    },
    /// Linear interpolation from `initial` at `t = 0` to `final` at `t = duration`.
    Ramp {
        /// Duration of the waveform.
        duration: f64,
        /// Value at `t = 0`.
        initial: f64,
        /// Value at `t = duration`.
        #[serde(rename = "final")]
        final_value: f64,
    },
    /// Waveforms played back to back.
    Composite {
        /// Segments, in playback order. Never nested after construction.
        parts: Vec<Waveform>,
    },
}

fn check_duration(duration: f64) -> IrResult<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(IrError::InvalidDuration(duration))
    }
}

fn check_value(value: f64) -> IrResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(IrError::NonFiniteValue(value))
    }
}

impl Waveform {
    /// An empty waveform.
    pub fn delay(duration: f64) -> IrResult<Self> {
        check_duration(duration)?;
        Ok(Self::Delay { duration })
    }

    /// A constant waveform.
    pub fn constant(duration: f64, value: f64) -> IrResult<Self> {
        check_duration(duration)?;
        check_value(value)?;
        Ok(Self::Constant { duration, value })
    }

    /// A linear ramp between two values.
    pub fn ramp(duration: f64, initial: f64, final_value: f64) -> IrResult<Self> {
        check_duration(duration)?;
        check_value(initial)?;
        check_value(final_value)?;
        Ok(Self::Ramp {
            duration,
            initial,
            final_value,
        })
    }

    /// Play `parts` back to back. Nested composites are flattened.
    pub fn composite(parts: impl IntoIterator<Item = Waveform>) -> IrResult<Self> {
        let mut flat = Vec::new();
        for part in parts {
            part.validate()?;
            match part {
                Self::Composite { parts } => flat.extend(parts),
                other => flat.push(other),
            }
        }
        if flat.is_empty() {
            return Err(IrError::EmptyComposite);
        }
        Ok(Self::Composite { parts: flat })
    }

    /// N ramps through N + 1 values.
    ///
    /// Requires at least two intervals, and no interval may be zero.
    pub fn piecewise_linear(durations: &[f64], values: &[f64]) -> IrResult<Self> {
        if durations.len() < 2 || durations.len() + 1 != values.len() {
            return Err(IrError::PiecewiseShape {
                durations: durations.len(),
                values: values.len(),
            });
        }
        let ramps = durations
            .iter()
            .zip(values.windows(2))
            .map(|(&d, pair)| Self::ramp(d, pair[0], pair[1]))
            .collect::<IrResult<Vec<_>>>()?;
        Self::composite(ramps)
    }

    /// Check a waveform obtained without the validating constructors,
    /// e.g. from deserialization.
    pub fn validate(&self) -> IrResult<()> {
        match self {
            Self::Delay { duration } => check_duration(*duration),
            Self::Constant { duration, value } => {
                check_duration(*duration)?;
                check_value(*value)
            }
            Self::Ramp {
                duration,
                initial,
                final_value,
            } => {
                check_duration(*duration)?;
                check_value(*initial)?;
                check_value(*final_value)
            }
            Self::Composite { parts } => {
                if parts.is_empty() {
                    return Err(IrError::EmptyComposite);
                }
                parts.iter().try_for_each(Self::validate)
            }
        }
    }

    /// Total duration.
    pub fn duration(&self) -> f64 {
        match self {
            Self::Delay { duration }
            | Self::Constant { duration, .. }
            | Self::Ramp { duration, .. } => *duration,
            Self::Composite { parts } => parts.iter().map(Self::duration).sum(),
        }
    }

    /// Value at dimensionless time `t`.
    ///
    /// In a composite, a segment boundary belongs to the later segment,
    /// except the final instant which belongs to the last segment.
    pub fn value(&self, t: f64) -> f64 {
        if t < 0.0 || t > self.duration() {
            return 0.0;
        }
        match self {
            Self::Delay { .. } => 0.0,
            Self::Constant { value, .. } => *value,
            Self::Ramp {
                duration,
                initial,
                final_value,
            } => initial + (t / duration) * (final_value - initial),
            Self::Composite { parts } => {
                let mut start = 0.0;
                for (i, part) in parts.iter().enumerate() {
                    let end = start + part.duration();
                    if t < end || i + 1 == parts.len() {
                        return part.value((t - start).min(part.duration()));
                    }
                    start = end;
                }
                0.0
            }
        }
    }

    /// Evaluate the waveform at each of `times`.
    pub fn sample(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.value(t)).collect()
    }

    /// Largest value over `[0, duration]`.
    pub fn max_value(&self) -> f64 {
        match self {
            Self::Delay { .. } => 0.0,
            Self::Constant { value, .. } => *value,
            Self::Ramp {
                initial,
                final_value,
                ..
            } => initial.max(*final_value),
            Self::Composite { parts } => parts
                .iter()
                .map(Self::max_value)
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Smallest value over `[0, duration]`.
    pub fn min_value(&self) -> f64 {
        match self {
            Self::Delay { .. } => 0.0,
            Self::Constant { value, .. } => *value,
            Self::Ramp {
                initial,
                final_value,
                ..
            } => initial.min(*final_value),
            Self::Composite { parts } => parts
                .iter()
                .map(Self::min_value)
                .fold(f64::INFINITY, f64::min),
        }
    }

    /// Largest magnitude over `[0, duration]`.
    pub fn max_abs_value(&self) -> f64 {
        self.max_value().abs().max(self.min_value().abs())
    }

    /// This waveform followed by `other`.
    pub fn then(self, other: Waveform) -> Self {
        let mut parts = match self {
            Self::Composite { parts } => parts,
            single => vec![single],
        };
        match other {
            Self::Composite { parts: tail } => parts.extend(tail),
            single => parts.push(single),
        }
        Self::Composite { parts }
    }

    /// Number of primitive segments.
    pub fn n_segments(&self) -> usize {
        match self {
            Self::Composite { parts } => parts.len(),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_durations() {
        assert!(matches!(
            Waveform::delay(0.0),
            Err(IrError::InvalidDuration(_))
        ));
        assert!(Waveform::constant(-1.0, 1.0).is_err());
        assert!(Waveform::ramp(f64::INFINITY, 0.0, 1.0).is_err());
        assert!(matches!(
            Waveform::constant(1.0, f64::NAN),
            Err(IrError::NonFiniteValue(_))
        ));
    }

    #[test]
    fn test_ramp_values() {
        let ramp = Waveform::ramp(2.0, 1.0, 3.0).unwrap();
        assert!((ramp.value(0.0) - 1.0).abs() < 1e-12);
        assert!((ramp.value(1.0) - 2.0).abs() < 1e-12);
        assert!((ramp.value(2.0) - 3.0).abs() < 1e-12);
        assert_eq!(ramp.value(2.5), 0.0);
        assert_eq!(ramp.value(-0.1), 0.0);
    }

    #[test]
    fn test_composite_boundaries() {
        let wf = Waveform::constant(1.0, 5.0)
            .unwrap()
            .then(Waveform::constant(1.0, 7.0).unwrap());
        assert!((wf.duration() - 2.0).abs() < 1e-12);
        assert_eq!(wf.value(0.5), 5.0);
        // Boundary belongs to the later segment.
        assert_eq!(wf.value(1.0), 7.0);
        // Final instant belongs to the last segment.
        assert_eq!(wf.value(2.0), 7.0);
        assert_eq!(wf.value(2.01), 0.0);
    }

    #[test]
    fn test_piecewise_linear() {
        let pwl = Waveform::piecewise_linear(&[1.0, 2.0, 1.0], &[0.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(pwl.n_segments(), 3);
        assert!((pwl.duration() - 4.0).abs() < 1e-12);
        assert!((pwl.value(0.5) - 0.5).abs() < 1e-12);
        assert!((pwl.value(2.0) - 1.0).abs() < 1e-12);
        assert!((pwl.value(3.5) - 0.5).abs() < 1e-12);
        assert_eq!(pwl.max_value(), 1.0);
        assert_eq!(pwl.min_value(), 0.0);
    }

    #[test]
    fn test_piecewise_linear_shape_errors() {
        assert!(matches!(
            Waveform::piecewise_linear(&[1.0], &[0.0, 1.0]),
            Err(IrError::PiecewiseShape { .. })
        ));
        assert!(Waveform::piecewise_linear(&[1.0, 1.0], &[0.0, 1.0]).is_err());
        assert!(Waveform::piecewise_linear(&[1.0, 0.0], &[0.0, 1.0, 2.0]).is_err());
    }

    #[test]
    fn test_extrema() {
        let wf = Waveform::ramp(1.0, -2.0, 0.5)
            .unwrap()
            .then(Waveform::delay(1.0).unwrap());
        assert_eq!(wf.max_value(), 0.5);
        assert_eq!(wf.min_value(), -2.0);
        assert_eq!(wf.max_abs_value(), 2.0);
    }

    #[test]
    fn test_composite_flattens() {
        let inner = Waveform::composite([
            Waveform::delay(1.0).unwrap(),
            Waveform::constant(1.0, 1.0).unwrap(),
        ])
        .unwrap();
        let outer = Waveform::composite([inner, Waveform::delay(1.0).unwrap()]).unwrap();
        assert_eq!(outer.n_segments(), 3);
        assert!(Waveform::composite(Vec::new()).is_err());
    }

    #[test]
    fn test_serde_tagging() {
        let wf = Waveform::ramp(1.0, 0.0, 2.0).unwrap();
        let json = serde_json::to_string(&wf).unwrap();
        assert!(json.contains(r#""kind":"ramp""#));
        assert!(json.contains(r#""final":2.0"#));

        let parsed: Waveform =
            serde_json::from_str(r#"{"kind":"constant","duration":-1.0,"value":1.0}"#).unwrap();
        assert!(parsed.validate().is_err());
    }
}
