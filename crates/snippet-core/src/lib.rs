//! # Snippet Core
//!
//! Shared, runtime-free logic for the snippet summarizer: data models,
//! validation rules, the error taxonomy, the store abstraction, the
//! summarizer trait, and the orchestration service that ties them together.
//!
//! This crate contains no tokio, sqlx, HTTP, or filesystem dependencies.
//! Concrete backends (SQLite store, Anthropic client) and the HTTP surface
//! live in the `snippet-summarizer` app crate.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | `Snippet`, health and connection-state types |
//! | [`validate`] | Write-time field rules for new snippets |
//! | [`error`] | `ValidationErrors`, `StoreError`, `SnippetError` |
//! | [`store`] | `SnippetStore` trait and the in-memory backend |
//! | [`summarize`] | `Summarizer` trait and `SummaryError` |
//! | [`service`] | `SnippetService`: create, get, list, health |

pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod summarize;
pub mod validate;

pub use error::{ErrorKind, FieldError, SnippetError, StoreError, ValidationErrors};
pub use models::{ConnectionState, HealthReport, ProviderState, Snippet};
pub use service::SnippetService;
pub use store::SnippetStore;
pub use summarize::{SummaryError, SummaryRequest, SummaryResponse, Summarizer};
