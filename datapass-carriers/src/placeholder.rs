//! Suppliers that answer without touching the network.

use async_trait::async_trait;
use datapass_core::FetchOutcome;
use datapass_fetch::FetchContext;
use tracing::debug;

use crate::supplier::DataSupplier;

/// Used while the user has not picked a carrier for a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct CarrierNotSelectedSupplier;

#[async_trait]
impl DataSupplier for CarrierNotSelectedSupplier {
    fn id(&self) -> &'static str {
        "not-selected"
    }

    fn is_real(&self) -> bool {
        false
    }

    async fn fetch(&self, _ctx: &FetchContext) -> FetchOutcome {
        debug!("No carrier selected");
        FetchOutcome::CarrierNotSelected
    }
}

/// Used for every carrier without a datapass page.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedCarrierSupplier;

#[async_trait]
impl DataSupplier for UnsupportedCarrierSupplier {
    fn id(&self) -> &'static str {
        "unsupported"
    }

    fn is_real(&self) -> bool {
        false
    }

    async fn fetch(&self, _ctx: &FetchContext) -> FetchOutcome {
        debug!("Carrier not supported");
        FetchOutcome::CarrierUnavailable
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use datapass_fetch::FixtureSource;

    use super::*;

    #[tokio::test]
    async fn test_placeholders_never_hit_network() {
        let source = Arc::new(FixtureSource::body("unused"));
        let ctx = FetchContext::with_source(source.clone());

        assert_eq!(
            CarrierNotSelectedSupplier.fetch(&ctx).await,
            FetchOutcome::CarrierNotSelected
        );
        assert_eq!(
            UnsupportedCarrierSupplier.fetch(&ctx).await,
            FetchOutcome::CarrierUnavailable
        );
        assert!(!CarrierNotSelectedSupplier.is_real());
        assert!(!UnsupportedCarrierSupplier.is_real());
        assert_eq!(source.calls(), 0);
    }
}
