use anyhow::Result;
use owo_colors::OwoColorize;
use quickcap_core::config::QuickcapConfig;
use quickcap_core::share;

use super::is_remote;
use crate::render::pluralize;
use crate::utils::tui::with_spinner;

/// Replaces everything in the configured store with the link's content.
pub async fn run(config: &QuickcapConfig, link: &str) -> Result<()> {
    let snapshot = share::decode_link(link)?;

    let store = config.store()?;
    let message = format!("Saving to {}", store.name());
    with_spinner(message, is_remote(store.as_ref()), store.replace_all(&snapshot)).await?;

    let count = snapshot.items.len();
    println!(
        "{}",
        format!("  Loaded {} {} from link", count, pluralize("item", count)).green()
    );
    Ok(())
}
