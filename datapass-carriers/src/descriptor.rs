//! Carrier descriptors.
//!
//! A descriptor holds the static configuration for one carrier family:
//! - Names (display, CLI, aliases)
//! - The operator-name marker used for resolution
//! - Where and how its usage page is read

use datapass_core::CarrierFamily;

use crate::datapass::{DATAPASS_URL, DatapassSupplier};

// ============================================================================
// Carrier Descriptor
// ============================================================================

/// Static configuration for a supported carrier family.
#[derive(Debug, Clone)]
pub struct CarrierDescriptor {
    /// Carrier family.
    pub family: CarrierFamily,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Primary CLI name.
    pub cli_name: &'static str,
    /// Alternative CLI names.
    pub aliases: &'static [&'static str],
    /// Case-sensitive substring of the operator name.
    pub operator_marker: &'static str,
    /// Whether the usage page must carry the provider imprint.
    pub expects_provider_marker: bool,
    /// Usage page.
    pub url: &'static str,
}

impl CarrierDescriptor {
    /// Returns true if `carrier_text` names this carrier.
    pub fn matches(&self, carrier_text: &str) -> bool {
        carrier_text.contains(self.operator_marker)
    }

    /// Builds the real supplier for this carrier.
    pub fn supplier(&self) -> DatapassSupplier {
        DatapassSupplier::new(self.family)
            .with_url(self.url)
            .with_provider_marker(self.expects_provider_marker)
    }
}

/// Descriptor for Telekom Deutschland.
pub fn telekom_descriptor() -> CarrierDescriptor {
    let family = CarrierFamily::Telekom;
    CarrierDescriptor {
        family,
        display_name: family.display_name(),
        cli_name: family.cli_name(),
        aliases: &["t-mobile", "tmobile"],
        operator_marker: family.operator_marker(),
        expects_provider_marker: family.expects_provider_marker(),
        url: DATAPASS_URL,
    }
}

/// Descriptor for congstar.
pub fn congstar_descriptor() -> CarrierDescriptor {
    let family = CarrierFamily::Congstar;
    CarrierDescriptor {
        family,
        display_name: family.display_name(),
        cli_name: family.cli_name(),
        aliases: &[],
        operator_marker: family.operator_marker(),
        expects_provider_marker: family.expects_provider_marker(),
        url: DATAPASS_URL,
    }
}
