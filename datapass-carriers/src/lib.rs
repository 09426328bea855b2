// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DataPass` Carriers
//!
//! Carrier-specific page parsing and data suppliers.
//!
//! Both supported carrier families publish their usage on the same datapass
//! page. They differ only in whether the page carries the network operator's
//! imprint, so there is one parser taking that expectation as a flag.
//!
//! | Carrier | Provider imprint expected | Supplier |
//! |---------|---------------------------|----------|
//! | Telekom | yes | [`DatapassSupplier`] |
//! | congstar | no | [`DatapassSupplier`] |
//! | (not selected) | - | [`CarrierNotSelectedSupplier`] |
//! | anything else | - | [`UnsupportedCarrierSupplier`] |
//!
//! ## Usage
//!
//! ```ignore
//! use datapass_carriers::CarrierRegistry;
//! use datapass_fetch::{FetchContext, FetchSettings};
//!
//! let supplier = CarrierRegistry::resolve("Telekom.de");
//! let ctx = FetchContext::with_settings(FetchSettings::default())?;
//! let outcome = supplier.fetch(&ctx).await;
//! ```

pub mod datapass;
pub mod descriptor;
pub mod error;
pub mod placeholder;
pub mod registry;
pub mod supplier;


pub use datapass::{
    DATAPASS_URL, DatapassSupplier, PROVIDER_MARKER, PageContent, PageLayout, ParseResult,
    VOLUME_USED_UP_MARKER, parse_datapass_page,
};
pub use descriptor::CarrierDescriptor;
pub use error::ParseError;
pub use placeholder::{CarrierNotSelectedSupplier, UnsupportedCarrierSupplier};
pub use registry::CarrierRegistry;
pub use supplier::DataSupplier;
