//! Domain models for `DataPass`.
//!
//! ## Submodules
//!
//! - [`carrier`] - Carrier families and the "not selected" sentinel
//! - [`usage`] - Usage readings and fetch outcomes
//! - [`update`] - Update modes and connectivity

mod carrier;
mod update;
mod usage;

pub use carrier::{CARRIER_NOT_SELECTED, CarrierFamily};
pub use update::{NetworkKind, UpdateMode};
pub use usage::{FetchOutcome, UsageReading};
