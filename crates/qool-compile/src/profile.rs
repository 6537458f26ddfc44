//! Compiler profiles: how the reference energy is chosen.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use qool_hal::Device;
use serde::{Deserialize, Serialize};

use crate::metrics::ProgramMetrics;

/// Name of a compiler profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKind {
    Default,
    MaxAmplitude,
    MinDistance,
    MaxDuration,
    Auto,
    Custom,
}

impl ProfileKind {
    /// Every profile name, in display order.
    pub const ALL: [ProfileKind; 6] = [
        Self::Default,
        Self::MaxAmplitude,
        Self::MinDistance,
        Self::MaxDuration,
        Self::Auto,
        Self::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::MaxAmplitude => "max-amplitude",
            Self::MinDistance => "min-distance",
            Self::MaxDuration => "max-duration",
            Self::Auto => "auto",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown profile '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// A scalar equation in the reference energy whose root is the desired
/// scale.
///
/// The engine searches for the root by bisection over the feasible
/// interval, so the residual must change sign across it.
pub trait ScaleObjective: fmt::Debug + Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Residual at reference energy `energy`.
    fn residual(&self, energy: f64, metrics: &ProgramMetrics, device: &Device) -> f64;
}

/// Settings for the bounded bisection search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BisectionConfig {
    /// Iteration cap; reaching it is a failure.
    pub max_iterations: usize,
    /// Relative bracket width at which the search stops.
    pub tolerance: f64,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-12,
        }
    }
}

/// User-defined profiles.
#[derive(Debug, Clone)]
pub enum CustomProfile {
    /// Pin the reference energy to a value.
    FixedEnergy(f64),
    /// Solve `objective.residual(E) = 0` over the feasible interval.
    Objective {
        objective: Arc<dyn ScaleObjective>,
        solver: BisectionConfig,
    },
}

/// Strategy for choosing the reference energy of a compilation.
#[derive(Debug, Clone, Default)]
pub enum CompilerProfile {
    /// Use the device's current converter as is.
    #[default]
    Default,
    /// Saturate the device amplitude limit.
    MaxAmplitude,
    /// Place the closest atom pair exactly at the device spacing limit.
    MinDistance,
    /// Stretch the program to the device duration limit.
    MaxDuration,
    /// Largest energy inside the feasible interval.
    Auto,
    /// User-defined choice.
    Custom(CustomProfile),
}

impl CompilerProfile {
    /// Profile pinning the reference energy.
    pub fn fixed_energy(energy: f64) -> Self {
        Self::Custom(CustomProfile::FixedEnergy(energy))
    }

    /// Profile solving `objective` with the default bisection settings.
    pub fn objective(objective: impl ScaleObjective + 'static) -> Self {
        Self::Custom(CustomProfile::Objective {
            objective: Arc::new(objective),
            solver: BisectionConfig::default(),
        })
    }

    /// Built-in profile for a name; `None` for [`ProfileKind::Custom`].
    pub fn from_kind(kind: ProfileKind) -> Option<Self> {
        match kind {
            ProfileKind::Default => Some(Self::Default),
            ProfileKind::MaxAmplitude => Some(Self::MaxAmplitude),
            ProfileKind::MinDistance => Some(Self::MinDistance),
            ProfileKind::MaxDuration => Some(Self::MaxDuration),
            ProfileKind::Auto => Some(Self::Auto),
            ProfileKind::Custom => None,
        }
    }

    pub fn kind(&self) -> ProfileKind {
        match self {
            Self::Default => ProfileKind::Default,
            Self::MaxAmplitude => ProfileKind::MaxAmplitude,
            Self::MinDistance => ProfileKind::MinDistance,
            Self::MaxDuration => ProfileKind::MaxDuration,
            Self::Auto => ProfileKind::Auto,
            Self::Custom(_) => ProfileKind::Custom,
        }
    }
}

/// Balance amplitude headroom against spacing headroom.
///
/// Finds the energy at which the relative margin below the amplitude limit
/// equals the relative margin above the spacing limit:
///
/// ```text
///   1 - a·E / Ω_max  =  1 - r_min / (d · (C6 / E)^(1/6))
/// ```
///
/// A root exists inside the feasible interval only when the amplitude limit
/// is the binding one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarginBalance;

impl ScaleObjective for MarginBalance {
    fn name(&self) -> &str {
        "margin-balance"
    }

    fn residual(&self, energy: f64, metrics: &ProgramMetrics, device: &Device) -> f64 {
        let amplitude_headroom = 1.0 - metrics.max_amplitude * energy / device.max_amplitude();
        let spacing_headroom = match metrics.min_pairwise_distance {
            Some(d) => {
                let physical = d * (device.interaction_coefficient() / energy).powf(1.0 / 6.0);
                1.0 - device.min_distance() / physical
            }
            None => 1.0,
        };
        amplitude_headroom - spacing_headroom
    }
}
