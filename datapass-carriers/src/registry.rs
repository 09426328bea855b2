//! Carrier registry.
//!
//! Maps free-text operator names to suppliers. Matching is a case-sensitive
//! substring test in fixed priority order: Telekom, congstar, the
//! "not selected" sentinel, and finally the unsupported fallback.

use std::collections::HashMap;
use std::sync::OnceLock;

use datapass_core::{CARRIER_NOT_SELECTED, CarrierFamily};
use tracing::debug;

use crate::descriptor::{CarrierDescriptor, congstar_descriptor, telekom_descriptor};
use crate::placeholder::{CarrierNotSelectedSupplier, UnsupportedCarrierSupplier};
use crate::supplier::DataSupplier;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all carrier descriptors.
static DESCRIPTORS: OnceLock<Vec<CarrierDescriptor>> = OnceLock::new();

/// Static storage for CLI name to carrier family mapping.
static CLI_NAME_MAP: OnceLock<HashMap<String, CarrierFamily>> = OnceLock::new();

/// Descriptors in resolution priority order.
fn init_descriptors() -> Vec<CarrierDescriptor> {
    vec![telekom_descriptor(), congstar_descriptor()]
}

fn build_cli_name_map(descriptors: &[CarrierDescriptor]) -> HashMap<String, CarrierFamily> {
    let mut map = HashMap::new();

    for desc in descriptors {
        map.insert(desc.cli_name.to_string(), desc.family);
        for alias in desc.aliases {
            map.insert((*alias).to_string(), desc.family);
        }
    }

    map
}

// ============================================================================
// Carrier Registry
// ============================================================================

/// Global registry of supported carriers.
pub struct CarrierRegistry;

impl CarrierRegistry {
    /// Returns all carrier descriptors in priority order.
    pub fn all() -> &'static [CarrierDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a descriptor by family.
    pub fn get(family: CarrierFamily) -> Option<&'static CarrierDescriptor> {
        Self::all().iter().find(|d| d.family == family)
    }

    /// Returns the CLI name to family mapping.
    pub fn cli_name_map() -> &'static HashMap<String, CarrierFamily> {
        CLI_NAME_MAP.get_or_init(|| build_cli_name_map(Self::all()))
    }

    /// Looks up a carrier by CLI name or alias.
    pub fn get_by_cli_name(name: &str) -> Option<&'static CarrierDescriptor> {
        let family = Self::cli_name_map().get(name)?;
        Self::get(*family)
    }

    /// Finds the first descriptor whose marker occurs in `carrier_text`.
    pub fn match_descriptor(carrier_text: &str) -> Option<&'static CarrierDescriptor> {
        Self::all().iter().find(|d| d.matches(carrier_text))
    }

    /// Returns true if `carrier_text` resolves to a real supplier.
    pub fn is_supported(carrier_text: &str) -> bool {
        Self::match_descriptor(carrier_text).is_some()
    }

    /// Resolves an operator name to its supplier.
    pub fn resolve(carrier_text: &str) -> Box<dyn DataSupplier> {
        let supplier: Box<dyn DataSupplier> = if let Some(desc) = Self::match_descriptor(carrier_text)
        {
            Box::new(desc.supplier())
        } else if carrier_text.contains(CARRIER_NOT_SELECTED) {
            Box::new(CarrierNotSelectedSupplier)
        } else {
            Box::new(UnsupportedCarrierSupplier)
        };

        debug!(carrier = carrier_text, supplier = supplier.id(), "Resolved carrier");
        supplier
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order() {
        let families: Vec<_> = CarrierRegistry::all().iter().map(|d| d.family).collect();
        assert_eq!(families, CarrierFamily::ALL.to_vec());
    }

    #[test]
    fn test_resolve_by_substring() {
        assert_eq!(CarrierRegistry::resolve("Telekom.de").id(), "telekom");
        assert_eq!(CarrierRegistry::resolve("congstar").id(), "congstar");
        assert_eq!(CarrierRegistry::resolve("Vodafone.de").id(), "unsupported");
        assert_eq!(CarrierRegistry::resolve("").id(), "unsupported");
        assert_eq!(
            CarrierRegistry::resolve(CARRIER_NOT_SELECTED).id(),
            "not-selected"
        );
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        assert_eq!(CarrierRegistry::resolve("telekom").id(), "unsupported");
        assert_eq!(CarrierRegistry::resolve("Congstar").id(), "unsupported");
    }

    #[test]
    fn test_resolve_priority() {
        // A real carrier marker beats the sentinel.
        let text = format!("Telekom {CARRIER_NOT_SELECTED}");
        assert_eq!(CarrierRegistry::resolve(&text).id(), "telekom");
        assert_eq!(CarrierRegistry::resolve("Telekom congstar").id(), "telekom");
    }

    #[test]
    fn test_real_suppliers() {
        assert!(CarrierRegistry::resolve("Telekom").is_real());
        assert!(!CarrierRegistry::resolve(CARRIER_NOT_SELECTED).is_real());
        assert!(!CarrierRegistry::resolve("o2").is_real());
    }

    #[test]
    fn test_cli_name_lookup() {
        assert_eq!(
            CarrierRegistry::get_by_cli_name("telekom").map(|d| d.family),
            Some(CarrierFamily::Telekom)
        );
        assert_eq!(
            CarrierRegistry::get_by_cli_name("t-mobile").map(|d| d.family),
            Some(CarrierFamily::Telekom)
        );
        assert!(CarrierRegistry::get_by_cli_name("vodafone").is_none());
    }
}
