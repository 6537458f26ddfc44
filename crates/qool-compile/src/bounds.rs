//! Device limits expressed as bounds on the reference energy.
//!
//! With the reference energy `E` as the single free parameter, every device
//! limit becomes a one-sided bound on `E`:
//!
//! | Limit                          | Bound                          |
//! |--------------------------------|--------------------------------|
//! | physical amplitude ≤ Ω_max     | `E ≤ Ω_max / a`                |
//! | physical detuning ≤ δ_max      | `E ≤ δ_max / abs(δ)`           |
//! | physical spacing ≥ r_min       | `E ≤ C6 · d⁶ / r_min⁶`         |
//! | physical duration ≤ T_max      | `E ≥ T · K / T_clk`            |
//!
//! `T_clk` is `T_max` rounded down to a whole number of clock periods.
//!
//! The feasible set is the intersection, an interval `[lower, upper]` where
//! either end may be absent.

use std::fmt;

use qool_hal::{Device, is_close};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metrics::ProgramMetrics;
use crate::profile::ProfileKind;

/// What a bound on the reference energy comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundSource {
    /// Device maximum amplitude.
    Amplitude,
    /// Device maximum absolute detuning.
    Detuning,
    /// Device minimum interatomic distance.
    Distance,
    /// Device maximum sequence duration.
    Duration,
    /// Energy pinned by a compiler profile.
    Profile(ProfileKind),
    /// Energy of a converter supplied directly.
    Converter,
}

impl fmt::Display for BoundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amplitude => write!(f, "amplitude bound"),
            Self::Detuning => write!(f, "detuning bound"),
            Self::Distance => write!(f, "distance bound"),
            Self::Duration => write!(f, "duration bound"),
            Self::Profile(kind) => write!(f, "{kind} profile"),
            Self::Converter => write!(f, "converter"),
        }
    }
}

/// Direction of a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    AtMost,
    AtLeast,
    Exactly,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AtMost => "<=",
            Self::AtLeast => ">=",
            Self::Exactly => "=",
        })
    }
}

/// A single constraint `E <relation> value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBound {
    pub source: BoundSource,
    pub relation: Relation,
    pub value: f64,
}

impl EnergyBound {
    pub fn at_most(source: BoundSource, value: f64) -> Self {
        Self {
            source,
            relation: Relation::AtMost,
            value,
        }
    }

    pub fn at_least(source: BoundSource, value: f64) -> Self {
        Self {
            source,
            relation: Relation::AtLeast,
            value,
        }
    }

    /// The energy a profile pins.
    pub fn pinned(profile: ProfileKind, value: f64) -> Self {
        Self {
            source: BoundSource::Profile(profile),
            relation: Relation::Exactly,
            value,
        }
    }

    /// Whether `energy` satisfies this bound, up to relative tolerance.
    pub fn admits(&self, energy: f64) -> bool {
        let close = is_close(energy, self.value);
        match self.relation {
            Relation::AtMost => energy <= self.value || close,
            Relation::AtLeast => energy >= self.value || close,
            Relation::Exactly => close,
        }
    }
}

impl fmt::Display for EnergyBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relation {
            Relation::Exactly => write!(f, "{} pins E = {:.6}", self.source, self.value),
            rel => write!(f, "{} requires E {} {:.6}", self.source, rel, self.value),
        }
    }
}

/// Two bounds that cannot hold together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Infeasibility {
    /// Profile being compiled, if the conflict involves one.
    pub profile: Option<ProfileKind>,
    /// The bound or pin that was chosen.
    pub selected: EnergyBound,
    /// The bound it contradicts.
    pub violated: EnergyBound,
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} but {}", self.selected, self.violated)
    }
}

/// The set of reference energies that satisfy every device limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibleInterval {
    bounds: Vec<EnergyBound>,
}

impl FeasibleInterval {
    /// Collect every bound that applies to `metrics` on `device`.
    pub fn from_constraints(metrics: &ProgramMetrics, device: &Device) -> Self {
        let mut bounds = Vec::with_capacity(4);

        if metrics.max_amplitude > 0.0 {
            bounds.push(EnergyBound::at_most(
                BoundSource::Amplitude,
                device.max_amplitude() / metrics.max_amplitude,
            ));
        }

        if let Some(max_det) = device.max_abs_detuning() {
            if metrics.max_abs_detuning > 0.0 {
                bounds.push(EnergyBound::at_most(
                    BoundSource::Detuning,
                    max_det / metrics.max_abs_detuning,
                ));
            }
        }

        // Fewer than two atoms or no spacing limit: nothing to bound.
        if let (Some(d), true) = (metrics.min_pairwise_distance, device.min_distance() > 0.0) {
            let ratio = d / device.min_distance();
            bounds.push(EnergyBound::at_most(
                BoundSource::Distance,
                device.interaction_coefficient() * ratio.powi(6),
            ));
        }

        // Sequences are padded up to whole clock periods.
        if let Some(max_duration) = device.max_sequence_duration() {
            let k = device.unit_system().time_energy_product;
            bounds.push(EnergyBound::at_least(
                BoundSource::Duration,
                metrics.duration * k / max_duration,
            ));
        }

        for bound in &bounds {
            debug!("Bound on device '{}': {}", device.name(), bound);
        }

        Self { bounds }
    }

    /// Build an interval from explicit bounds.
    pub fn from_bounds(bounds: Vec<EnergyBound>) -> Self {
        Self { bounds }
    }

    /// All collected bounds.
    pub fn bounds(&self) -> &[EnergyBound] {
        &self.bounds
    }

    /// Tightest lower bound.
    pub fn lower(&self) -> Option<&EnergyBound> {
        self.bounds
            .iter()
            .filter(|b| b.relation != Relation::AtMost)
            .max_by(|a, b| a.value.total_cmp(&b.value))
    }

    /// Tightest upper bound.
    pub fn upper(&self) -> Option<&EnergyBound> {
        self.bounds
            .iter()
            .filter(|b| b.relation != Relation::AtLeast)
            .min_by(|a, b| a.value.total_cmp(&b.value))
    }

    /// Whether the tightest bounds cross.
    pub fn is_empty(&self) -> bool {
        self.conflict().is_some()
    }

    /// Whether `energy` satisfies every bound.
    pub fn contains(&self, energy: f64) -> bool {
        self.first_violation(energy).is_none()
    }

    /// First bound `energy` fails, in collection order.
    pub fn first_violation(&self, energy: f64) -> Option<&EnergyBound> {
        self.bounds.iter().find(|b| !b.admits(energy))
    }

    /// Largest feasible energy, if an upper bound exists and the interval
    /// is not empty.
    pub fn supremum(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        self.upper().map(|b| b.value)
    }

    /// The crossing pair of bounds when the interval is empty.
    pub fn conflict(&self) -> Option<Infeasibility> {
        let (lower, upper) = (self.lower()?, self.upper()?);
        if upper.value < lower.value && !is_close(upper.value, lower.value) {
            Some(Infeasibility {
                profile: None,
                selected: *upper,
                violated: *lower,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for FeasibleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = self.lower().map(|b| format!("{:.6}", b.value));
        let hi = self.upper().map(|b| format!("{:.6}", b.value));
        write!(
            f,
            "[{}, {}]",
            lo.as_deref().unwrap_or("0"),
            hi.as_deref().unwrap_or("inf")
        )
    }
}
