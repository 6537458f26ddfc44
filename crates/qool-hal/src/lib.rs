//! Qool Hardware Abstraction Layer
//!
//! This crate describes what a neutral-atom device can do and how
//! dimensionless program quantities map onto its physical units.
//!
//! # Core Components
//!
//! - [`UnitConverter`] / [`UnitSystem`]: time, energy and distance scales
//!   tied together by `time * energy = K` and `distance^6 * energy = C6`
//! - [`Device`]: validated capability descriptor with a current converter
//! - [`DeviceSpec`]: serializable device description (YAML / JSON)
//! - [`DeviceRegistry`]: name-keyed collection of device descriptions
//!
//! # Example
//!
//! ```rust
//! use qool_hal::{Device, UnitConverter};
//!
//! let mut device = Device::mock();
//! device.set_energy_unit(10.0).unwrap();
//!
//! let converter = device.converter();
//! assert!((converter.time_scale() - 100.0).abs() < 1e-9);
//! assert!((converter.to_physical_energy(0.5) - 5.0).abs() < 1e-9);
//!
//! let same = UnitConverter::from_distance(device.interaction_coefficient(), converter.distance_scale()).unwrap();
//! assert_eq!(&same, converter);
//! ```

pub mod device;
pub mod error;
pub mod registry;
pub mod spec;
pub mod units;

pub use device::Device;
pub use error::{HalError, HalResult, Quantity};
pub use registry::DeviceRegistry;
pub use spec::DeviceSpec;
pub use units::{
    DEFAULT_TIME_ENERGY_PRODUCT, RELATIVE_TOLERANCE, UnitConverter, UnitSystem, is_close,
};
