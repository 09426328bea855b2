// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # DataPass Fetch
//!
//! HTML retrieval for the DataPass application.
//!
//! The carrier publishes usage on a page that only answers over the mobile
//! network. This crate provides the one network capability the suppliers
//! need:
//!
//! - [`host::HtmlSource`] - Trait: POST with an empty body, return the page text
//! - [`host::http::HttpClient`] - reqwest implementation with bounded timeouts
//! - [`host::fixture::FixtureSource`] - Canned responses for tests and offline runs
//! - [`context::FetchContext`] - Bundles the source with its settings
//!
//! ## Example
//!
//! ```ignore
//! use datapass_fetch::{FetchContext, FetchSettings};
//!
//! let ctx = FetchContext::with_settings(FetchSettings::default())?;
//! let html = ctx.html.post_empty("https://datapass.de/").await?;
//! ```

pub mod context;
pub mod error;
pub mod host;

// Errors
pub use error::HttpError;

// Host APIs
pub use host::{HtmlSource, fixture::FixtureSource, http::HttpClient};

// Context
pub use context::{DEFAULT_USER_AGENT, FetchContext, FetchSettings};
