//! Host APIs for page retrieval.
//!
//! - [`http`] - reqwest client with timeouts and domain allowlist
//! - [`fixture`] - In-memory source serving a canned page

pub mod fixture;
pub mod http;

use async_trait::async_trait;

use crate::error::HttpError;

pub use fixture::FixtureSource;
pub use http::HttpClient;

/// Capability to retrieve the carrier page.
///
/// One call is one POST with an empty body. Implementations do not retry.
#[async_trait]
pub trait HtmlSource: Send + Sync {
    /// Posts an empty body to `url` and returns the full response text.
    async fn post_empty(&self, url: &str) -> Result<String, HttpError>;
}
