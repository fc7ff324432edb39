//! Character search

use crate::console::CliConsole;
use anyhow::Context;
use colored::*;
use spicy_sdk::{Character, SpicyClient};

/// Search public characters and print one line per hit
pub async fn search(client: &SpicyClient, query: &str, per_page: u32) -> anyhow::Result<()> {
    let result = client
        .search(query, per_page)
        .await
        .context("Search failed")?;

    let console = CliConsole;
    console.print_header(&format!("{} characters found", result.found));
    if result.hits.is_empty() {
        console.warn("No matches");
        return Ok(());
    }

    for hit in &result.hits {
        println!("{}", describe(&hit.document));
    }
    Ok(())
}

fn describe(character: &Character) -> String {
    let mut line = format!("• {}", character.name.green().bold());
    if let Some(title) = character.title.as_deref().filter(|t| !t.is_empty()) {
        line.push_str(&format!(" - {}", title));
    }
    line.push_str(&format!(
        " {}",
        format!("[{} messages, id {}]", character.num_messages, character.id).dimmed()
    ));
    if !character.tags.is_empty() {
        line.push_str(&format!(" {}", character.tags.join(", ").cyan()));
    }
    line
}
