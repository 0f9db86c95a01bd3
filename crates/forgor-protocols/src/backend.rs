//! Relevance backend trait.

use async_trait::async_trait;

use crate::error::ClientError;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Remote check endpoint as seen by the relevance poller.
///
/// Implemented over HTTP by the client crate; tests substitute in-memory
/// fakes to drive the pipeline under a paused clock.
#[async_trait]
pub trait RelevanceBackend: Send + Sync {
    /// Whether an authenticated call can be attempted.
    ///
    /// A partial pair is no session, except that a lone refresh token gets
    /// one refresh attempt before answering.
    async fn ensure_session(&self) -> bool;

    /// POST `{searchText}` to the check endpoint.
    ///
    /// Non-OK statuses are returned as a [`RawResponse`], not as errors.
    async fn check_text(&self, search_text: &str) -> Result<RawResponse, ClientError>;
}
