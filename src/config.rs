//! Configuration parsing and validation.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults (every field has one).
//! 2. An optional TOML file passed with `--config`.
//! 3. Environment variables (a `.env` file is loaded first by `main`).
//!
//! ```toml
//! [db]
//! path = "./data/snippets.sqlite"
//!
//! [summarizer]
//! model = "claude-3-5-sonnet-20241022"
//! max_tokens = 1000
//! temperature = 0.7
//! max_length = 30
//! timeout_secs = 30
//! base_url = "https://api.anthropic.com"
//!
//! [server]
//! bind = "0.0.0.0:3000"
//! ```
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `DATABASE_PATH` | `db.path` |
//! | `ANTHROPIC_MODEL` | `summarizer.model` |
//! | `CLAUDE_MAX_TOKENS` | `summarizer.max_tokens` |
//! | `CLAUDE_TEMPERATURE` | `summarizer.temperature` |
//! | `PORT` | port of `server.bind` (the host is kept) |
//!
//! The provider credential is never read from the file; it comes from
//! `ANTHROPIC_API_KEY` only (see [`crate::summarizer`]).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/snippets.sqlite")
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummarizerConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Summary length requested in the prompt, in characters.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_length: default_max_length(),
            timeout_secs: default_timeout_secs(),
            base_url: default_base_url(),
        }
    }
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_length() -> usize {
    snippet_core::summarize::DEFAULT_MAX_LENGTH
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

impl Config {
    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Takes a lookup function rather than reading the process environment
    /// directly so tests can supply their own values.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DATABASE_PATH") {
            self.db.path = PathBuf::from(path);
        }
        if let Some(model) = lookup("ANTHROPIC_MODEL") {
            self.summarizer.model = model;
        }
        if let Some(raw) = lookup("CLAUDE_MAX_TOKENS") {
            self.summarizer.max_tokens = raw
                .trim()
                .parse()
                .with_context(|| format!("CLAUDE_MAX_TOKENS is not an integer: '{}'", raw))?;
        }
        if let Some(raw) = lookup("CLAUDE_TEMPERATURE") {
            self.summarizer.temperature = raw
                .trim()
                .parse()
                .with_context(|| format!("CLAUDE_TEMPERATURE is not a number: '{}'", raw))?;
        }
        if let Some(raw) = lookup("PORT") {
            let port: u16 = raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: '{}'", raw))?;
            let host = self
                .server
                .bind
                .rsplit_once(':')
                .map(|(host, _)| host)
                .unwrap_or("0.0.0.0");
            self.server.bind = format!("{}:{}", host, port);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.summarizer.model.trim().is_empty() {
            anyhow::bail!("summarizer.model must not be empty");
        }
        if self.summarizer.max_tokens == 0 {
            anyhow::bail!("summarizer.max_tokens must be > 0");
        }
        if !(0.0..=1.0).contains(&self.summarizer.temperature) {
            anyhow::bail!("summarizer.temperature must be in [0.0, 1.0]");
        }
        if self.summarizer.max_length == 0 {
            anyhow::bail!("summarizer.max_length must be > 0");
        }
        if self.summarizer.timeout_secs == 0 {
            anyhow::bail!("summarizer.timeout_secs must be > 0");
        }
        if self.server.bind.trim().is_empty() {
            anyhow::bail!("server.bind must not be empty");
        }
        Ok(())
    }
}

/// Parse a TOML config document, without environment overrides.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from an optional file plus the process environment.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&content).with_context(|| "Failed to parse config file")?
        }
        None => Config::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.summarizer.model, "claude-3-5-sonnet-20241022");
        assert_eq!(config.summarizer.max_tokens, 1000);
        assert_eq!(config.summarizer.max_length, 30);
        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.db.path, PathBuf::from("./data/snippets.sqlite"));
    }

    #[test]
    fn file_values_override_defaults() {
        let config = parse_config(
            r#"
            [db]
            path = "/tmp/x.sqlite"

            [summarizer]
            model = "claude-3-haiku-20240307"
            temperature = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.db.path, PathBuf::from("/tmp/x.sqlite"));
        assert_eq!(config.summarizer.model, "claude-3-haiku-20240307");
        assert_eq!(config.summarizer.temperature, 0.2);
        assert_eq!(config.summarizer.max_tokens, 1000);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(parse_config("[summarizer]\ntemperature = 1.5").is_err());
        assert!(parse_config("[summarizer]\nmax_tokens = 0").is_err());
        assert!(parse_config("[summarizer]\nmodel = \"  \"").is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("DATABASE_PATH", "/var/lib/snip.sqlite"),
                ("ANTHROPIC_MODEL", "claude-3-haiku-20240307"),
                ("CLAUDE_MAX_TOKENS", "200"),
                ("CLAUDE_TEMPERATURE", "0.1"),
                ("PORT", "8080"),
            ]))
            .unwrap();

        assert_eq!(config.db.path, PathBuf::from("/var/lib/snip.sqlite"));
        assert_eq!(config.summarizer.model, "claude-3-haiku-20240307");
        assert_eq!(config.summarizer.max_tokens, 200);
        assert_eq!(config.summarizer.temperature, 0.1);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn port_keeps_configured_host() {
        let mut config = parse_config("[server]\nbind = \"127.0.0.1:4000\"").unwrap();
        config.apply_env(env(&[("PORT", "5000")])).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:5000");
    }

    #[test]
    fn malformed_env_values_fail() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("CLAUDE_MAX_TOKENS", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("CLAUDE_MAX_TOKENS"));

        assert!(Config::default()
            .apply_env(env(&[("PORT", "99999")]))
            .is_err());
    }
}
