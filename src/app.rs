//! Process-level wiring.
//!
//! Builds the store and summarizer from configuration and hands them to a
//! [`SnippetService`]. The entry point owns the returned [`App`] and closes
//! it on shutdown; nothing here is a global.

use std::sync::Arc;

use anyhow::Result;

use snippet_core::{SnippetService, Summarizer};

use crate::config::Config;
use crate::sqlite_store::SqliteSnippetStore;
use crate::summarizer::AnthropicSummarizer;
use crate::{db, migrate};

/// Live dependencies for one process.
pub struct App {
    pub service: Arc<SnippetService>,
    store: Arc<SqliteSnippetStore>,
}

impl App {
    /// Connect to the database, ensure the schema exists, and build the
    /// summarizer from the environment.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        migrate::migrate_pool(&pool).await?;
        let store = Arc::new(SqliteSnippetStore::new(pool));

        let summarizer = AnthropicSummarizer::from_env(&config.summarizer)?;
        if !summarizer.is_configured() {
            tracing::warn!(
                "{} is not set; snippet creation will fail until it is",
                crate::summarizer::API_KEY_ENV
            );
        } else {
            tracing::info!(model = summarizer.model_name(), "summarizer configured");
        }

        let service = SnippetService::new(store.clone(), Arc::new(summarizer))
            .with_summary_max_length(config.summarizer.max_length);

        Ok(Self {
            service: Arc::new(service),
            store,
        })
    }

    /// Close the database pool.
    pub async fn close(&self) {
        self.store.close().await;
    }
}
