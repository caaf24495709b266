//! # Snippet Summarizer
//!
//! **A small REST service that stores text snippets alongside an
//! AI-generated one-line summary.**
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────────┐   ┌──────────────┐
//! │  HTTP    │──▶│ SnippetService │──▶│   SQLite     │
//! │  (axum)  │   │ validate→sum→  │   │  snippets    │
//! └──────────┘   │ persist        │   └──────────────┘
//! ┌──────────┐   │                │   ┌──────────────┐
//! │   CLI    │──▶│                │──▶│  Anthropic   │
//! │  (snip)  │   └────────────────┘   │ Messages API │
//! └──────────┘                        └──────────────┘
//! ```
//!
//! The service, models, validation rules and store trait live in the
//! runtime-free `snippet-core` crate. This crate supplies the concrete
//! backends and the two front doors.
//!
//! ## Quick Start
//!
//! ```bash
//! export ANTHROPIC_API_KEY=...
//! snip init                                   # create database
//! snip create "Some text of at least thirty characters..."
//! snip list
//! snip serve                                  # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration, environment overrides, validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Database schema migrations (idempotent) |
//! | [`sqlite_store`] | SQLite `SnippetStore` implementation |
//! | [`summarizer`] | Anthropic `Summarizer` implementation |
//! | [`app`] | Builds the service from configuration |
//! | [`server`] | REST HTTP server (axum) with CORS |
//! | [`commands`] | CLI command implementations |

pub mod app;
pub mod commands;
pub mod config;
pub mod db;
pub mod migrate;
pub mod server;
pub mod sqlite_store;
pub mod summarizer;

pub use snippet_core::{store, Snippet, SnippetError, SnippetService};
