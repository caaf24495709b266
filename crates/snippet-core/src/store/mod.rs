//! Storage abstraction for snippets.
//!
//! The [`SnippetStore`] trait defines the operations the service needs,
//! enabling pluggable backends (SQLite in the app crate, in-memory here).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{ConnectionState, Snippet};

/// Abstract storage backend for snippets.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`create`](SnippetStore::create) | Validate and insert a new snippet |
/// | [`find_by_id`](SnippetStore::find_by_id) | Fetch one snippet |
/// | [`find_all`](SnippetStore::find_all) | Fetch every snippet |
/// | [`is_valid_id`](SnippetStore::is_valid_id) | Check identifier format without I/O |
/// | [`connection_state`](SnippetStore::connection_state) | Report backend reachability |
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Validate and persist a new snippet, assigning its id and timestamps.
    ///
    /// Fails with [`StoreError::Validation`] when the text or summary
    /// breaks a rule from [`crate::validate`].
    async fn create(&self, text: &str, summary: &str) -> Result<Snippet, StoreError>;

    /// Fetch a snippet by id. `Ok(None)` when no record matches.
    async fn find_by_id(&self, id: &str) -> Result<Option<Snippet>, StoreError>;

    /// Fetch all snippets in store-native order. Empty when the store is.
    async fn find_all(&self) -> Result<Vec<Snippet>, StoreError>;

    /// Whether `id` has the shape of an identifier this store issues.
    fn is_valid_id(&self, id: &str) -> bool;

    /// Current reachability of the backend.
    async fn connection_state(&self) -> ConnectionState;
}

/// Identifier check shared by stores that issue UUIDs.
pub fn is_uuid(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

/// Generate a fresh snippet identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
