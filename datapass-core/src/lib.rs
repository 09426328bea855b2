// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DataPass` Core
//!
//! Core types and unit handling for the `DataPass` mobile data monitor.
//!
//! This crate provides the foundational abstractions used across all other
//! `DataPass` crates, including:
//!
//! - Binary unit normalization (`GB`/`MB`/`kB`/`bytes`)
//! - Domain models (usage readings, fetch outcomes, carriers)
//! - Error types
//!
//! ## Key Types
//!
//! ### Units
//! - [`DataUnit`] - Binary data unit with 1024-based multipliers
//! - [`parse_locale_decimal`] - Comma-as-decimal number parsing
//!
//! ### Usage Types
//! - [`UsageReading`] - Wasted/available bytes plus carrier timestamp
//! - [`FetchOutcome`] - Tagged result of one fetch attempt
//!
//! ### Carrier & Update Types
//! - [`CarrierFamily`] - The carrier families served by the datapass page
//! - [`UpdateMode`] - How much feedback an update shows
//! - [`NetworkKind`] - Connectivity type seen when an update starts

pub mod error;
pub mod models;
pub mod units;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Carrier types
    CARRIER_NOT_SELECTED,
    CarrierFamily,
    // Usage types
    FetchOutcome,
    UsageReading,
    // Update types
    NetworkKind,
    UpdateMode,
};

// Re-export units
pub use units::{DataUnit, parse_locale_decimal};
