//! Conversion between dimensionless and physical units.
//!
//! A [`UnitConverter`] holds three scale factors tied together by two
//! invariants:
//!
//! ```text
//!   time * energy       = K        (time-energy product of the unit system)
//!   distance^6 * energy = C6       (interaction coefficient of the device)
//! ```
//!
//! Fixing any one scale therefore fixes the other two. With the default
//! [`UnitSystem`] (`K = 1000`) times are in ns, energies in rad/µs and
//! distances in µm.
//!
//! Converters are immutable. Changing the reference scale means building a
//! new converter, never editing one factor in place.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult, Quantity};

/// Time-energy product of the ns / rad·µs⁻¹ / µm unit system.
pub const DEFAULT_TIME_ENERGY_PRODUCT: f64 = 1000.0;

/// Relative tolerance used for every scale comparison.
pub const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Relative closeness test with [`RELATIVE_TOLERANCE`].
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= RELATIVE_TOLERANCE * a.abs().max(b.abs())
}

fn check_scale(quantity: Quantity, value: f64) -> HalResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(HalError::InvalidScale { quantity, value })
    }
}

/// The physical unit system: which constant links time and energy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitSystem {
    /// `time_scale * energy_scale` for every converter in this system.
    pub time_energy_product: f64,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self {
            time_energy_product: DEFAULT_TIME_ENERGY_PRODUCT,
        }
    }
}

impl UnitSystem {
    /// Create a unit system with a custom time-energy product.
    pub fn new(time_energy_product: f64) -> HalResult<Self> {
        check_scale(Quantity::TimeEnergyProduct, time_energy_product)?;
        Ok(Self {
            time_energy_product,
        })
    }

    /// Converter with `energy_scale = energy`.
    pub fn from_energy(&self, c6: f64, energy: f64) -> HalResult<UnitConverter> {
        check_scale(Quantity::InteractionCoefficient, c6)?;
        check_scale(Quantity::Energy, energy)?;
        UnitConverter::derived_from_energy(*self, c6, energy).checked()
    }

    /// Converter with `time_scale = time`.
    pub fn from_time(&self, c6: f64, time: f64) -> HalResult<UnitConverter> {
        check_scale(Quantity::InteractionCoefficient, c6)?;
        check_scale(Quantity::Time, time)?;
        let energy = self.time_energy_product / time;
        let converter = UnitConverter {
            c6,
            time_energy_product: self.time_energy_product,
            time,
            energy,
            distance: (c6 / energy).powf(1.0 / 6.0),
        };
        converter.checked()
    }

    /// Converter with `distance_scale = distance`.
    pub fn from_distance(&self, c6: f64, distance: f64) -> HalResult<UnitConverter> {
        check_scale(Quantity::InteractionCoefficient, c6)?;
        check_scale(Quantity::Distance, distance)?;
        let energy = c6 / distance.powi(6);
        let converter = UnitConverter {
            c6,
            time_energy_product: self.time_energy_product,
            time: self.time_energy_product / energy,
            energy,
            distance,
        };
        converter.checked()
    }
}

/// Scale factors between dimensionless and physical values.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnitConverter {
    #[serde(rename = "interaction_coefficient")]
    c6: f64,
    time_energy_product: f64,
    time: f64,
    energy: f64,
    distance: f64,
}

impl UnitConverter {
    /// Build a converter from explicit factors in the default unit system.
    ///
    /// Fails if the factors do not satisfy both invariants.
    pub fn new(c6: f64, time: f64, energy: f64, distance: f64) -> HalResult<Self> {
        Self::new_in(UnitSystem::default(), c6, time, energy, distance)
    }

    /// Build a converter from explicit factors in `system`.
    pub fn new_in(
        system: UnitSystem,
        c6: f64,
        time: f64,
        energy: f64,
        distance: f64,
    ) -> HalResult<Self> {
        let converter = Self {
            c6: check_scale(Quantity::InteractionCoefficient, c6)?,
            time_energy_product: system.time_energy_product,
            time,
            energy,
            distance,
        }
        .checked()?;

        if !is_close(time * energy, system.time_energy_product) {
            return Err(HalError::InvariantViolated(format!(
                "time-energy invariant violated: {time} * {energy} != {}",
                system.time_energy_product
            )));
        }
        if !is_close(distance.powi(6) * energy, c6) {
            return Err(HalError::InvariantViolated(format!(
                "energy-distance invariant violated: {distance}^6 * {energy} != {c6}"
            )));
        }
        Ok(converter)
    }

    /// Converter fixing the energy scale, default unit system.
    pub fn from_energy(c6: f64, energy: f64) -> HalResult<Self> {
        UnitSystem::default().from_energy(c6, energy)
    }

    /// Converter fixing the time scale, default unit system.
    pub fn from_time(c6: f64, time: f64) -> HalResult<Self> {
        UnitSystem::default().from_time(c6, time)
    }

    /// Converter fixing the distance scale, default unit system.
    pub fn from_distance(c6: f64, distance: f64) -> HalResult<Self> {
        UnitSystem::default().from_distance(c6, distance)
    }

    /// Unchecked derivation for inputs already known to be valid.
    pub(crate) fn derived_from_energy(system: UnitSystem, c6: f64, energy: f64) -> Self {
        Self {
            c6,
            time_energy_product: system.time_energy_product,
            time: system.time_energy_product / energy,
            energy,
            distance: (c6 / energy).powf(1.0 / 6.0),
        }
    }

    fn checked(self) -> HalResult<Self> {
        check_scale(Quantity::Time, self.time)?;
        check_scale(Quantity::Energy, self.energy)?;
        check_scale(Quantity::Distance, self.distance)?;
        Ok(self)
    }

    /// The unit system this converter belongs to.
    pub fn unit_system(&self) -> UnitSystem {
        UnitSystem {
            time_energy_product: self.time_energy_product,
        }
    }

    /// Interaction coefficient the converter was built for.
    pub fn c6(&self) -> f64 {
        self.c6
    }

    /// Time scale factor.
    pub fn time_scale(&self) -> f64 {
        self.time
    }

    /// Energy scale factor.
    pub fn energy_scale(&self) -> f64 {
        self.energy
    }

    /// Distance scale factor.
    pub fn distance_scale(&self) -> f64 {
        self.distance
    }

    /// `(time, energy, distance)` factors.
    pub fn factors(&self) -> (f64, f64, f64) {
        (self.time, self.energy, self.distance)
    }

    /// Same C6 and unit system, new reference time.
    pub fn with_time(&self, time: f64) -> HalResult<Self> {
        self.unit_system().from_time(self.c6, time)
    }

    /// Same C6 and unit system, new reference energy.
    pub fn with_energy(&self, energy: f64) -> HalResult<Self> {
        self.unit_system().from_energy(self.c6, energy)
    }

    /// Same C6 and unit system, new reference distance.
    pub fn with_distance(&self, distance: f64) -> HalResult<Self> {
        self.unit_system().from_distance(self.c6, distance)
    }

    pub fn to_physical_time(&self, t: f64) -> f64 {
        t * self.time
    }

    pub fn to_physical_energy(&self, e: f64) -> f64 {
        e * self.energy
    }

    pub fn to_physical_distance(&self, d: f64) -> f64 {
        d * self.distance
    }

    pub fn to_dimensionless_time(&self, t: f64) -> f64 {
        t / self.time
    }

    pub fn to_dimensionless_energy(&self, e: f64) -> f64 {
        e / self.energy
    }

    pub fn to_dimensionless_distance(&self, d: f64) -> f64 {
        d / self.distance
    }
}

impl PartialEq for UnitConverter {
    fn eq(&self, other: &Self) -> bool {
        is_close(self.time, other.time)
            && is_close(self.energy, other.energy)
            && is_close(self.distance, other.distance)
    }
}

impl fmt::Display for UnitConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UnitConverter(time = {:.6}, energy = {:.6}, distance = {:.6})",
            self.time, self.energy, self.distance
        )
    }
}
