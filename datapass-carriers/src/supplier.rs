//! The data supplier capability.

use async_trait::async_trait;
use datapass_core::FetchOutcome;
use datapass_fetch::FetchContext;

/// Produces one [`FetchOutcome`] per call.
///
/// Implementations never fail past this boundary: transport and parse
/// problems are logged and reported as [`FetchOutcome::Error`]. There are no
/// retries at this layer.
#[async_trait]
pub trait DataSupplier: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &'static str;

    /// Returns true if this supplier talks to a carrier.
    fn is_real(&self) -> bool;

    /// Fetches the current usage.
    async fn fetch(&self, ctx: &FetchContext) -> FetchOutcome;
}
