//! SQLite-backed [`SnippetStore`] implementation.
//!
//! Maps each store operation to a query against the `snippets` table
//! created by [`crate::migrate`]. Identifiers are UUID v4 strings;
//! timestamps are stored as Unix milliseconds.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use snippet_core::models::{now_millis, ConnectionState, Snippet};
use snippet_core::store::{is_uuid, new_id, SnippetStore};
use snippet_core::validate::validate_new_snippet;
use snippet_core::StoreError;

/// SQLite implementation of the [`SnippetStore`] trait.
pub struct SqliteSnippetStore {
    pool: SqlitePool,
    closing: AtomicBool,
}

impl SqliteSnippetStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            closing: AtomicBool::new(false),
        }
    }

    /// Close the pool, waiting for checked-out connections to return.
    ///
    /// While this runs, [`connection_state`](SnippetStore::connection_state)
    /// reports `disconnecting`.
    pub async fn close(&self) {
        self.closing.store(true, Ordering::SeqCst);
        self.pool.close().await;
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Backend(format!("invalid stored timestamp: {}", ms)))
}

fn row_to_snippet(row: &SqliteRow) -> Result<Snippet, StoreError> {
    let created_at: i64 = row.try_get("created_at").map_err(backend)?;
    let updated_at: i64 = row.try_get("updated_at").map_err(backend)?;

    Ok(Snippet {
        id: row.try_get("id").map_err(backend)?,
        text: row.try_get("text").map_err(backend)?,
        summary: row.try_get("summary").map_err(backend)?,
        created_at: millis_to_datetime(created_at)?,
        updated_at: millis_to_datetime(updated_at)?,
    })
}

#[async_trait]
impl SnippetStore for SqliteSnippetStore {
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

        sqlx::query(
            r#"
            INSERT INTO snippets (id, text, summary, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&snippet.id)
        .bind(&snippet.text)
        .bind(&snippet.summary)
        .bind(snippet.created_at.timestamp_millis())
        .bind(snippet.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(snippet)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Snippet>, StoreError> {
        let row = sqlx::query(
            "SELECT id, text, summary, created_at, updated_at FROM snippets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.as_ref().map(row_to_snippet).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Snippet>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, text, summary, created_at, updated_at FROM snippets ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(row_to_snippet).collect()
    }

    fn is_valid_id(&self, id: &str) -> bool {
        is_uuid(id)
    }

    async fn connection_state(&self) -> ConnectionState {
        if self.pool.is_closed() {
            return ConnectionState::Disconnected;
        }
        if self.closing.load(Ordering::SeqCst) {
            return ConnectionState::Disconnecting;
        }
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => ConnectionState::Connected,
            Err(e) => {
                tracing::warn!(error = %e, "database ping failed");
                ConnectionState::Connecting
            }
        }
    }
}
