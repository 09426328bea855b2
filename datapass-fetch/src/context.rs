//! Fetch context providing access to the page source.
//!
//! The context is passed to every supplier. Real suppliers use
//! [`FetchContext::html`] for their single request; placeholder suppliers
//! never touch it.

use std::sync::Arc;
use std::time::Duration;

use crate::error::HttpError;
use crate::host::{HtmlSource, http::HttpClient};

/// Desktop browser identity the datapass page answers to.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 5.1; rv:19.0) Gecko/20100101 Firefox/19.0";

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Time allowed to establish the connection.
    pub connect_timeout: Duration,
    /// Time allowed between reads of the response.
    pub read_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Hosts requests may go to. `None` allows any host.
    pub allowed_domains: Option<Vec<String>>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(7000),
            read_timeout: Duration::from_millis(7000),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allowed_domains: Some(vec!["datapass.de".to_string()]),
        }
    }
}

impl FetchSettings {
    /// Sets both connect and read timeout.
    #[must_use]
    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    /// Removes the domain allowlist.
    #[must_use]
    pub fn allow_any_domain(mut self) -> Self {
        self.allowed_domains = None;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context passed to suppliers.
#[derive(Clone)]
pub struct FetchContext {
    /// Page source.
    pub html: Arc<dyn HtmlSource>,
    /// Settings the source was built with.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context backed by a real HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_settings(settings: FetchSettings) -> Result<Self, HttpError> {
        let client = HttpClient::with_settings(&settings)?;
        Ok(Self {
            html: Arc::new(client),
            settings,
        })
    }

    /// Creates a context around an existing source.
    pub fn with_source(html: Arc<dyn HtmlSource>) -> Self {
        Self {
            html,
            settings: FetchSettings::default(),
        }
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
