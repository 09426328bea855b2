//! HTTP client with tracing, bounded timeouts, and domain allowlist.
//!
//! The datapass page is requested with a plain POST, an empty body, and a
//! desktop browser User-Agent. Connect and read timeouts are both bounded so
//! a stalled mobile connection cannot keep an update alive forever.

use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, instrument};
use url::Url;

use super::HtmlSource;
use crate::context::FetchSettings;
use crate::error::HttpError;

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing, timeouts and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Setup`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_settings(&FetchSettings::default())
    }

    /// Creates a client from fetch settings.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Setup`] if the TLS backend cannot be initialized.
    pub fn with_settings(settings: &FetchSettings) -> Result<Self, HttpError> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.read_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| HttpError::Setup(e.to_string()))?;

        Ok(Self {
            inner: client,
            allowed_domains: settings.allowed_domains.clone(),
        })
    }

    /// Restricts requests to the given domains (and their subdomains).
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), HttpError> {
        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }
}

#[async_trait]
impl HtmlSource for HttpClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn post_empty(&self, url: &str) -> Result<String, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("POST request with empty body");

        let response = self
            .inner
            .post(url)
            .header(header::CONTENT_LENGTH, 0)
            .body(Vec::new())
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Response received");
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(len = body.len(), "Body read");
        Ok(body)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowlist() {
        let client = HttpClient::new()
            .unwrap()
            .with_allowed_domains(vec!["datapass.de".to_string()]);

        assert!(client.is_domain_allowed("https://datapass.de/").is_ok());
        assert!(client.is_domain_allowed("https://pass.datapass.de/home").is_ok());
        assert!(client.is_domain_allowed("https://evil.com/steal").is_err());
        assert!(client.is_domain_allowed("https://notdatapass.de/").is_err());
    }

    #[test]
    fn test_no_domain_restrictions() {
        let client = HttpClient::new().unwrap();
        assert!(client.is_domain_allowed("https://any.domain.com").is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = HttpClient::new().unwrap();
        assert!(matches!(
            client.is_domain_allowed("not-a-valid-url"),
            Err(HttpError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_disallowed_domain_fails_before_network() {
        let client = HttpClient::new()
            .unwrap()
            .with_allowed_domains(vec!["datapass.de".to_string()]);
        let result = client.post_empty("https://example.org/").await;
        assert!(matches!(result, Err(HttpError::DomainNotAllowed(_))));
    }
}
