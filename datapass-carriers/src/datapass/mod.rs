//! The carrier datapass page.
//!
//! Reachable only over the mobile network of the Telekom infrastructure.
//! Telekom and congstar customers get the same page; only Telekom's carries
//! the provider imprint.
//!
//! - [`parser`] - Page layouts and token extraction
//! - [`supplier`] - The real supplier that requests and parses the page

pub(crate) mod parser;
mod supplier;

pub use parser::{PageContent, PageLayout, ParseResult, parse_datapass_page};
pub use supplier::DatapassSupplier;

/// Page showing the current data volume.
pub const DATAPASS_URL: &str = "https://datapass.de/";

/// Present on the page when the data volume is used up.
pub const VOLUME_USED_UP_MARKER: &str = "Ihr Datenvolumen ist aufgebraucht";

/// Imprint shown only on pages served to Telekom customers.
pub const PROVIDER_MARKER: &str = "Telekom Deutschland GmbH";

/// Opens the volume box in the current layout.
pub const CURRENT_LAYOUT_MARKER: &str = "div class=\"volume fit-text-to-container";
