//! Real supplier backed by the datapass page.

use async_trait::async_trait;
use datapass_core::{CarrierFamily, FetchOutcome};
use datapass_fetch::FetchContext;
use tracing::{instrument, warn};

use super::DATAPASS_URL;
use super::parser::parse_datapass_page;
use crate::supplier::DataSupplier;

/// Requests the datapass page once and parses it for one carrier family.
#[derive(Debug, Clone, Copy)]
pub struct DatapassSupplier {
    family: CarrierFamily,
    url: &'static str,
    expects_provider_marker: bool,
}

impl DatapassSupplier {
    /// Creates a supplier for `family` reading the public datapass page.
    pub fn new(family: CarrierFamily) -> Self {
        Self {
            family,
            url: DATAPASS_URL,
            expects_provider_marker: family.expects_provider_marker(),
        }
    }

    /// Reads the usage page from `url` instead.
    #[must_use]
    pub fn with_url(mut self, url: &'static str) -> Self {
        self.url = url;
        self
    }

    /// Overrides whether the page must carry the provider imprint.
    #[must_use]
    pub fn with_provider_marker(mut self, expected: bool) -> Self {
        self.expects_provider_marker = expected;
        self
    }

    /// The carrier family this supplier parses for.
    pub fn family(&self) -> CarrierFamily {
        self.family
    }

    /// Usage page this supplier requests.
    pub fn url(&self) -> &'static str {
        self.url
    }
}

#[async_trait]
impl DataSupplier for DatapassSupplier {
    fn id(&self) -> &'static str {
        self.family.cli_name()
    }

    fn is_real(&self) -> bool {
        true
    }

    #[instrument(skip(self, ctx), fields(carrier = %self.family, url = self.url))]
    async fn fetch(&self, ctx: &FetchContext) -> FetchOutcome {
        let html = match ctx.html.post_empty(self.url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "Datapass request failed");
                return FetchOutcome::Error;
            }
        };

        match parse_datapass_page(&html, self.expects_provider_marker) {
            Ok(content) => content.into(),
            Err(e) => {
                warn!(error = %e, "Datapass page not parsable");
                FetchOutcome::Error
            }
        }
    }
}
