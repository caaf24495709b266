//! In-memory [`SnippetStore`] implementation for tests and embedding.
//!
//! Keeps snippets in a `Vec` behind `std::sync::RwLock`, so records are
//! returned in insertion order.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{now_millis, ConnectionState, Snippet};
use crate::validate::validate_new_snippet;

use super::{is_uuid, new_id, SnippetStore};

/// In-memory snippet store.
pub struct InMemorySnippetStore {
    snippets: RwLock<Vec<Snippet>>,
}

impl InMemorySnippetStore {
    pub fn new() -> Self {
        Self {
            snippets: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.snippets.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySnippetStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl SnippetStore for InMemorySnippetStore {
    async fn create(&self, text: &str, summary: &str) -> Result<Snippet, StoreError> {
        let fields = validate_new_snippet(Some(text), Some(summary))?;
        let now = now_millis();
        let snippet = Snippet {
            id: new_id(),
            text: fields.text,
            summary: fields.summary,
            created_at: now,
            updated_at: now,
        };
        self.snippets
            .write()
            .map_err(poisoned)?
            .push(snippet.clone());
        Ok(snippet)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Snippet>, StoreError> {
        let snippets = self.snippets.read().map_err(poisoned)?;
        Ok(snippets.iter().find(|s| s.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Snippet>, StoreError> {
        Ok(self.snippets.read().map_err(poisoned)?.clone())
    }

    fn is_valid_id(&self, id: &str) -> bool {
        is_uuid(id)
    }

    async fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }
}
