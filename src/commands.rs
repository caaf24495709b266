//! CLI entry points for the snippet operations.
//!
//! Each `run_*` function calls the same [`SnippetService`] operation the
//! HTTP server uses and prints the result to stdout. Errors propagate to
//! `main`, which prints them and exits non-zero.

use anyhow::Result;

use snippet_core::{Snippet, SnippetService};

fn print_snippet(snippet: &Snippet) {
    println!("--- Snippet ---");
    println!("id:         {}", snippet.id);
    println!(
        "created_at: {}",
        snippet_core::models::format_iso_millis(&snippet.created_at)
    );
    println!(
        "updated_at: {}",
        snippet_core::models::format_iso_millis(&snippet.updated_at)
    );
    println!("summary:    {}", snippet.summary);
    println!();
    println!("--- Text ---");
    println!("{}", snippet.text);
}

/// `snip create <text>`
pub async fn run_create(service: &SnippetService, text: &str) -> Result<()> {
    let snippet = service.create_snippet(Some(text)).await?;
    println!("Snippet created successfully.");
    print_snippet(&snippet);
    Ok(())
}

/// `snip get <id>`
pub async fn run_get(service: &SnippetService, id: &str) -> Result<()> {
    let snippet = service.get_snippet(id).await?;
    print_snippet(&snippet);
    Ok(())
}

/// `snip list`
pub async fn run_list(service: &SnippetService) -> Result<()> {
    let snippets = service.list_snippets().await?;
    if snippets.is_empty() {
        println!("No snippets.");
        return Ok(());
    }

    println!("{} snippet(s):", snippets.len());
    for s in &snippets {
        println!("  {}  {}", s.id, s.summary);
    }
    Ok(())
}

/// `snip health`
pub async fn run_health(service: &SnippetService) -> Result<()> {
    let report = service.health().await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
