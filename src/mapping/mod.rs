//! Deterministic rule-based mapping: canonical flow names, substance-aware
//! unit conversion, and category/location/type classification.

pub mod classify;
pub mod names;
pub mod units;

pub use classify::*;
pub use names::*;
pub use units::*;
