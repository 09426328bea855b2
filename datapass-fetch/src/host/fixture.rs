//! In-memory page source.
//!
//! Serves a fixed body (or a fixed failure) and counts how often it was hit.
//! Used by tests and by the CLI when parsing a saved page.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::HtmlSource;
use crate::error::HttpError;

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Failure(String),
}

/// A source that always answers the same way.
#[derive(Debug)]
pub struct FixtureSource {
    reply: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FixtureSource {
    /// Answers every request with `body`.
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            reply: Reply::Body(body.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every request with a transport error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Reply::Failure(reason.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Waits `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HtmlSource for FixtureSource {
    async fn post_empty(&self, url: &str) -> Result<String, HttpError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(url, call = n, "Fixture request");

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Failure(reason) => Err(HttpError::Transport(reason.clone())),
        }
    }
}
