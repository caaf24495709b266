//! Snippet orchestration: validate, summarize, persist.
//!
//! [`SnippetService`] owns no state of its own. It receives a store and a
//! summarizer at construction, so the process entry point controls their
//! lifecycle and tests can pass fakes.
//!
//! # Create flow
//!
//! 1. Validate the text with the store's rules (no external call yet).
//! 2. Ask the summarizer for a summary. Any failure aborts the operation;
//!    nothing is written.
//! 3. Persist `{text, summary}` and return the stored record.

use std::sync::Arc;

use crate::error::SnippetError;
use crate::models::{HealthReport, ProviderState, Snippet};
use crate::store::SnippetStore;
use crate::summarize::{SummaryRequest, Summarizer, DEFAULT_MAX_LENGTH};
use crate::validate::validate_text;

/// Create / get / list operations over an injected store and summarizer.
pub struct SnippetService {
    store: Arc<dyn SnippetStore>,
    summarizer: Arc<dyn Summarizer>,
    summary_max_length: usize,
}

impl SnippetService {
    pub fn new(store: Arc<dyn SnippetStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            store,
            summarizer,
            summary_max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Override the summary length requested from the provider.
    pub fn with_summary_max_length(mut self, max_length: usize) -> Self {
        self.summary_max_length = max_length;
        self
    }

    /// Create a snippet from raw request text.
    ///
    /// `text` is optional because a request body may omit it; a missing
    /// value fails validation like an empty one.
    ///
    /// # Errors
    ///
    /// - [`SnippetError::Validation`] for missing, blank, or short text.
    /// - [`SnippetError::Summary`] when the summarizer fails.
    /// - [`SnippetError::Store`] when the write fails for a non-validation reason.
    pub async fn create_snippet(&self, text: Option<&str>) -> Result<Snippet, SnippetError> {
        let text = validate_text(text).map_err(SnippetError::Validation)?;

        let request = SummaryRequest::new(text.as_str()).with_max_length(self.summary_max_length);
        let summary = self.summarizer.generate_summary(request).await?;

        let snippet = self.store.create(&text, &summary.summary).await?;
        Ok(snippet)
    }

    /// Fetch one snippet.
    ///
    /// Malformed ids are rejected before the store is consulted.
    pub async fn get_snippet(&self, id: &str) -> Result<Snippet, SnippetError> {
        if !self.store.is_valid_id(id) {
            return Err(SnippetError::InvalidId(id.to_string()));
        }

        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| SnippetError::NotFound(id.to_string()))
    }

    /// Fetch every snippet.
    pub async fn list_snippets(&self) -> Result<Vec<Snippet>, SnippetError> {
        Ok(self.store.find_all().await?)
    }

    /// Report store and provider reachability.
    pub async fn health(&self) -> HealthReport {
        let claude = if !self.summarizer.is_configured() {
            ProviderState::NotConfigured
        } else if self.summarizer.health_check().await {
            ProviderState::Connected
        } else {
            ProviderState::Error
        };

        HealthReport {
            status: "ok".to_string(),
            db: self.store.connection_state().await,
            claude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, StoreError};
    use crate::models::ConnectionState;
    use crate::store::memory::InMemorySnippetStore;
    use crate::summarize::{SummaryError, SummaryResponse};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Summarizer that echoes a fixed summary or fails, recording requests.
    struct FakeSummarizer {
        result: Result<String, SummaryError>,
        configured: bool,
        requests: Mutex<Vec<SummaryRequest>>,
    }

    impl FakeSummarizer {
        fn ok(summary: &str) -> Self {
            Self {
                result: Ok(summary.to_string()),
                configured: true,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: SummaryError) -> Self {
            Self {
                result: Err(err),
                configured: true,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Summarizer for FakeSummarizer {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate_summary(
            &self,
            request: SummaryRequest,
        ) -> Result<SummaryResponse, SummaryError> {
            self.requests.lock().unwrap().push(request);
            self.result.clone().map(|summary| SummaryResponse {
                summary,
                tokens_used: Some(150),
            })
        }

        async fn health_check(&self) -> bool {
            self.result.is_ok()
        }
    }

    /// Store whose reads fail and which counts lookups.
    struct BrokenStore {
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl SnippetStore for BrokenStore {
        async fn create(&self, _text: &str, _summary: &str) -> Result<Snippet, StoreError> {
            Err(StoreError::Backend("disk full".into()))
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<Snippet>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Backend("Database connection error".into()))
        }

        async fn find_all(&self) -> Result<Vec<Snippet>, StoreError> {
            Err(StoreError::Backend("Database connection error".into()))
        }

        fn is_valid_id(&self, id: &str) -> bool {
            crate::store::is_uuid(id)
        }

        async fn connection_state(&self) -> ConnectionState {
            ConnectionState::Disconnected
        }
    }

    fn service(summarizer: Arc<FakeSummarizer>) -> (SnippetService, Arc<InMemorySnippetStore>) {
        let store = Arc::new(InMemorySnippetStore::new());
        (SnippetService::new(store.clone(), summarizer), store)
    }

    #[tokio::test]
    async fn create_stores_text_and_summary() {
        let summarizer = Arc::new(FakeSummarizer::ok("Mock summary"));
        let (svc, _) = service(summarizer.clone());
        let text = "a".repeat(40);

        let snippet = svc.create_snippet(Some(&text)).await.unwrap();
        assert_eq!(snippet.text, text);
        assert_eq!(snippet.summary, "Mock summary");

        let requests = summarizer.requests.lock().unwrap();
        assert_eq!(requests.as_slice(), &[SummaryRequest::new(text.as_str())]);
    }

    #[tokio::test]
    async fn invalid_text_never_reaches_summarizer() {
        let summarizer = Arc::new(FakeSummarizer::ok("Mock summary"));
        let (svc, store) = service(summarizer.clone());

        for input in [None, Some(""), Some("    "), Some("short words")] {
            let err = svc.create_snippet(input).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "input {:?}", input);
        }
        assert_eq!(summarizer.calls(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn summarizer_failure_persists_nothing() {
        let summarizer = Arc::new(FakeSummarizer::failing(SummaryError::RateLimited));
        let (svc, store) = service(summarizer);

        let err = svc.create_snippet(Some(&"b".repeat(45))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dependency);
        assert_eq!(err.to_string(), "Rate limit exceeded");
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_summary_is_a_validation_failure() {
        let (svc, store) = service(Arc::new(FakeSummarizer::ok("   ")));
        let err = svc.create_snippet(Some(&"c".repeat(35))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("Summary is required"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn get_round_trips_created_snippet() {
        let (svc, _) = service(Arc::new(FakeSummarizer::ok("Mock summary")));
        let created = svc.create_snippet(Some(&"d".repeat(31))).await.unwrap();
        let fetched = svc.get_snippet(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_distinguishes_malformed_and_missing_ids() {
        let (svc, _) = service(Arc::new(FakeSummarizer::ok("Mock summary")));

        let err = svc.get_snippet("invalid-id").await.unwrap_err();
        assert!(matches!(err, SnippetError::InvalidId(_)));

        let err = svc
            .get_snippet("0f8fad5b-d9cb-469f-a165-70867728950e")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn malformed_id_skips_store_lookup() {
        let store = Arc::new(BrokenStore {
            lookups: AtomicUsize::new(0),
        });
        let svc = SnippetService::new(store.clone(), Arc::new(FakeSummarizer::ok("s")));

        let err = svc.get_snippet("invalid-id").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);

        let err = svc
            .get_snippet("0f8fad5b-d9cb-469f-a165-70867728950e")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Database connection error");
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn store_failures_are_dependency_errors() {
        let store = Arc::new(BrokenStore {
            lookups: AtomicUsize::new(0),
        });
        let svc = SnippetService::new(store, Arc::new(FakeSummarizer::ok("summary")));

        let err = svc.list_snippets().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dependency);

        let err = svc.create_snippet(Some(&"e".repeat(30))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dependency);
        assert_eq!(err.to_string(), "disk full");
    }

    #[tokio::test]
    async fn list_returns_exactly_the_created_snippets() {
        let (svc, _) = service(Arc::new(FakeSummarizer::ok("Mock summary")));
        assert!(svc.list_snippets().await.unwrap().is_empty());

        let mut created = HashSet::new();
        for i in 0..3 {
            let text = format!("Snippet number {} with enough characters to pass", i);
            created.insert(svc.create_snippet(Some(&text)).await.unwrap().id);
        }

        let listed: HashSet<String> = svc
            .list_snippets()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(listed, created);
    }

    #[tokio::test]
    async fn health_reports_provider_state() {
        let (svc, _) = service(Arc::new(FakeSummarizer::ok("s")));
        let report = svc.health().await;
        assert_eq!(report.status, "ok");
        assert_eq!(report.db, ConnectionState::Connected);
        assert_eq!(report.claude, ProviderState::Connected);

        let (svc, _) = service(Arc::new(FakeSummarizer::failing(SummaryError::Failed)));
        assert_eq!(svc.health().await.claude, ProviderState::Error);

        let mut unconfigured = FakeSummarizer::ok("s");
        unconfigured.configured = false;
        let (svc, _) = service(Arc::new(unconfigured));
        assert_eq!(svc.health().await.claude, ProviderState::NotConfigured);
    }
}
