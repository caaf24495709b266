//! Summarizer trait and its error vocabulary.
//!
//! Defines the [`Summarizer`] trait that summarization backends implement.
//! The concrete Anthropic client lives in the `snippet-summarizer` app
//! crate; tests substitute their own implementations.
//!
//! Provider failures are collapsed into the fixed set of messages in
//! [`SummaryError`]. Callers never see raw provider payloads.

use async_trait::async_trait;

/// Default requested summary length, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 30;

/// Input to [`Summarizer::generate_summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub text: String,
    /// Requested upper bound on summary length. Advisory: the provider's
    /// reply is passed through even when longer.
    pub max_length: usize,
}

impl SummaryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

/// A generated summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResponse {
    pub summary: String,
    pub tokens_used: Option<u64>,
}

/// Stable, user-safe summarization failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("Text is required for summary generation")]
    TextRequired,
    /// No credential available. Carries the name of the missing variable.
    #[error("{0} is required in environment variables")]
    NotConfigured(&'static str),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("API quota exceeded")]
    QuotaExceeded,
    #[error("Rate limit exceeded")]
    RateLimited,
    /// Transport failure, timeout, empty reply, or an unclassified provider error.
    #[error("Failed to generate summary")]
    Failed,
}

/// A text summarization backend.
///
/// Implementations hold any reusable client handle and must be safe to
/// share across concurrent requests.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Whether a credential is available. Issues no request.
    fn is_configured(&self) -> bool;

    /// Summarize `request.text`.
    ///
    /// # Errors
    ///
    /// [`SummaryError::TextRequired`] for blank text,
    /// [`SummaryError::NotConfigured`] without a credential, otherwise
    /// one of the classified provider failures.
    async fn generate_summary(
        &self,
        request: SummaryRequest,
    ) -> Result<SummaryResponse, SummaryError>;

    /// Minimal provider round trip. `false` on any failure.
    async fn health_check(&self) -> bool;
}
