//! CLI command implementations.

pub mod common;
pub mod compile;
pub mod devices;
pub mod feasibility;
pub mod units;
pub mod version;
