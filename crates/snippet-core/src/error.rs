//! Error taxonomy.
//!
//! Every failure the service can report falls into one of three kinds
//! (see [`ErrorKind`]): client-side validation, a missing record, or a
//! failing dependency (store or summarization provider). The HTTP layer
//! maps kinds to status codes; nothing below it knows about HTTP.

use serde::{Deserialize, Serialize};

use crate::summarize::SummaryError;

/// A single violated field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// One or more field rules violated by a write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Snippet validation failed: {}", describe(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

fn describe(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors returned by a [`SnippetStore`](crate::store::SnippetStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Any failure of the backend itself (connection, I/O, query).
    #[error("{0}")]
    Backend(String),
}

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Dependency,
}

/// Errors returned by [`SnippetService`](crate::service::SnippetService) operations.
#[derive(Debug, thiserror::Error)]
pub enum SnippetError {
    #[error(transparent)]
    Validation(ValidationErrors),
    #[error("The provided id '{0}' is not a valid snippet identifier")]
    InvalidId(String),
    #[error("Snippet not found")]
    NotFound(String),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error("{0}")]
    Store(String),
}

impl SnippetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SnippetError::Validation(_) | SnippetError::InvalidId(_) => ErrorKind::Validation,
            SnippetError::NotFound(_) => ErrorKind::NotFound,
            SnippetError::Summary(_) | SnippetError::Store(_) => ErrorKind::Dependency,
        }
    }

    /// Field-level reasons, present only for validation failures.
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            SnippetError::Validation(v) => Some(v.fields()),
            _ => None,
        }
    }
}

impl From<StoreError> for SnippetError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(v) => SnippetError::Validation(v),
            StoreError::Backend(reason) => SnippetError::Store(reason),
        }
    }
}
