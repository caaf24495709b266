//! Anthropic-backed [`Summarizer`] implementation.
//!
//! Calls the Messages API (`POST {base_url}/v1/messages`) with a single
//! user message asking for a summary of at most `max_length` characters.
//! Requires the `ANTHROPIC_API_KEY` environment variable; without it the
//! summarizer reports itself unconfigured and every call fails fast.
//!
//! # Error classification
//!
//! Failures are classified from the provider's structured error body
//! (`{"type": "error", "error": {"type": "...", "message": "..."}}`),
//! falling back to the HTTP status when the body has no recognised type:
//!
//! | `error.type` | Status | Result |
//! |--------------|--------|--------|
//! | `authentication_error` | 401 | `Invalid API key` |
//! | `billing_error` | 402 | `API quota exceeded` |
//! | `rate_limit_error` | 429 | `Rate limit exceeded` |
//! | anything else | any | `Failed to generate summary` |
//!
//! Transport errors and timeouts also map to `Failed to generate summary`.
//! The raw provider response is logged, never returned. There is no retry.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use snippet_core::summarize::{SummaryError, SummaryRequest, SummaryResponse, Summarizer};

use crate::config::SummarizerConfig;

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Messages API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const HEALTH_CHECK_MAX_TOKENS: u32 = 10;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
}

/// Summarizer using the Anthropic Messages API.
///
/// Holds one `reqwest::Client` (with its connection pool) for the life of
/// the process; clones of the client are cheap and safe across requests.
pub struct AnthropicSummarizer {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f64,
    base_url: String,
}

impl AnthropicSummarizer {
    /// Create a summarizer from configuration and an optional credential.
    ///
    /// A blank key is treated as missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SummarizerConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a summarizer reading the credential from [`API_KEY_ENV`].
    pub fn from_env(config: &SummarizerConfig) -> Result<Self> {
        Self::new(config, std::env::var(API_KEY_ENV).ok())
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    async fn send(
        &self,
        content: &str,
        max_tokens: u32,
        temperature: Option<f64>,
    ) -> Result<MessagesResponse, SummaryError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SummaryError::NotConfigured(API_KEY_ENV))?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens,
            temperature,
            messages: vec![Message {
                role: "user",
                content,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Anthropic request failed");
                SummaryError::Failed
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let err = classify_provider_error(status.as_u16(), &body_text);
            tracing::error!(
                status = status.as_u16(),
                body = %body_text,
                classified = %err,
                "Anthropic API error"
            );
            return Err(err);
        }

        response.json::<MessagesResponse>().await.map_err(|e| {
            tracing::error!(error = %e, "invalid Anthropic response body");
            SummaryError::Failed
        })
    }
}

/// Map a failed provider response to a stable [`SummaryError`].
///
/// Prefers the structured `error.type` field; falls back to the status.
pub fn classify_provider_error(status: u16, body: &str) -> SummaryError {
    let kind = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.kind);

    match kind.as_deref() {
        Some("authentication_error") => SummaryError::InvalidApiKey,
        Some("billing_error") => SummaryError::QuotaExceeded,
        Some("rate_limit_error") => SummaryError::RateLimited,
        Some(_) => SummaryError::Failed,
        None => match status {
            401 => SummaryError::InvalidApiKey,
            402 => SummaryError::QuotaExceeded,
            429 => SummaryError::RateLimited,
            _ => SummaryError::Failed,
        },
    }
}

/// Build the user prompt sent for a summary request.
pub fn build_summary_prompt(text: &str, max_length: usize) -> String {
    format!(
        "Please provide a concise summary of the following text. The summary should be no more than \
         {} characters and capture the main points clearly.\n\nText to summarize:\"{}\"",
        max_length, text
    )
}

fn first_text(response: &MessagesResponse) -> Option<&str> {
    response
        .content
        .first()
        .filter(|block| block.kind == "text")
        .and_then(|block| block.text.as_deref())
}

#[async_trait]
impl Summarizer for AnthropicSummarizer {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate_summary(
        &self,
        request: SummaryRequest,
    ) -> Result<SummaryResponse, SummaryError> {
        if request.text.trim().is_empty() {
            return Err(SummaryError::TextRequired);
        }
        if !self.is_configured() {
            return Err(SummaryError::NotConfigured(API_KEY_ENV));
        }

        let prompt = build_summary_prompt(&request.text, request.max_length);
        let response = self
            .send(&prompt, self.max_tokens, Some(self.temperature))
            .await?;

        let summary = first_text(&response).map(str::trim).unwrap_or_default();
        if summary.is_empty() {
            tracing::error!("Anthropic returned no summary text");
            return Err(SummaryError::Failed);
        }

        let tokens_used = response
            .usage
            .as_ref()
            .map(|u| u.input_tokens + u.output_tokens);
        tracing::debug!(model = %self.model, tokens_used, "summary generated");

        Ok(SummaryResponse {
            summary: summary.to_string(),
            tokens_used,
        })
    }

    async fn health_check(&self) -> bool {
        if !self.is_configured() {
            return false;
        }
        match self.send("Hello", HEALTH_CHECK_MAX_TOKENS, None).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Anthropic health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_structured_error_type() {
        let body = |kind: &str| {
            format!(
                r#"{{"type":"error","error":{{"type":"{}","message":"whatever the provider says"}}}}"#,
                kind
            )
        };
        assert_eq!(
            classify_provider_error(401, &body("authentication_error")),
            SummaryError::InvalidApiKey
        );
        assert_eq!(
            classify_provider_error(429, &body("rate_limit_error")),
            SummaryError::RateLimited
        );
        assert_eq!(
            classify_provider_error(400, &body("billing_error")),
            SummaryError::QuotaExceeded
        );
        assert_eq!(
            classify_provider_error(529, &body("overloaded_error")),
            SummaryError::Failed
        );
    }

    #[test]
    fn structured_type_wins_over_status() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"rate limit"}}"#;
        assert_eq!(classify_provider_error(429, body), SummaryError::Failed);
    }

    #[test]
    fn falls_back_to_status_without_a_body() {
        assert_eq!(classify_provider_error(401, ""), SummaryError::InvalidApiKey);
        assert_eq!(
            classify_provider_error(402, "<html>"),
            SummaryError::QuotaExceeded
        );
        assert_eq!(classify_provider_error(429, ""), SummaryError::RateLimited);
        assert_eq!(classify_provider_error(503, ""), SummaryError::Failed);
    }

    #[test]
    fn prompt_names_length_and_text() {
        let prompt = build_summary_prompt("hello world", 30);
        assert!(prompt.contains("no more than 30 characters"));
        assert!(prompt.ends_with("Text to summarize:\"hello world\""));
    }

    #[test]
    fn blank_key_counts_as_unconfigured() {
        let config = SummarizerConfig::default();
        let s = AnthropicSummarizer::new(&config, Some("   ".into())).unwrap();
        assert!(!s.is_configured());
        let s = AnthropicSummarizer::new(&config, Some("sk-test".into())).unwrap();
        assert!(s.is_configured());
    }

    #[tokio::test]
    async fn unconfigured_fails_without_network() {
        let s = AnthropicSummarizer::new(&SummarizerConfig::default(), None).unwrap();
        let err = s
            .generate_summary(SummaryRequest::new("a".repeat(40)))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "ANTHROPIC_API_KEY is required in environment variables"
        );
        assert!(!s.health_check().await);
    }

    #[tokio::test]
    async fn blank_text_is_rejected_first() {
        let s = AnthropicSummarizer::new(&SummarizerConfig::default(), None).unwrap();
        let err = s
            .generate_summary(SummaryRequest::new("   "))
            .await
            .unwrap_err();
        assert_eq!(err, SummaryError::TextRequired);
    }
}
