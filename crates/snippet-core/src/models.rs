//! Core data models.
//!
//! [`Snippet`] is the only persistent entity. Its JSON rendering is the
//! wire contract shared by the REST API and the CLI: `id`, `text`,
//! `summary`, `createdAt`, `updatedAt`, and nothing else.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// A stored text input plus its AI-generated summary.
///
/// Created once, never mutated, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub text: String,
    pub summary: String,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Current time truncated to millisecond precision.
///
/// Both stores stamp records with this so a value read back from SQLite
/// compares equal to the one returned at creation.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Format a timestamp as ISO-8601 with milliseconds (`2024-05-01T12:00:00.000Z`).
pub fn format_iso_millis(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn serialize_iso_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_iso_millis(ts))
}

/// Connection state of the persistence backend, as reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Connecting,
    Disconnected,
    Disconnecting,
}

/// Reachability of the summarization provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderState {
    Connected,
    Error,
    NotConfigured,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Always `"ok"` when the process is serving.
    pub status: String,
    pub db: ConnectionState,
    pub claude: ProviderState,
}
