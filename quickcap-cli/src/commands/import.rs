use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use quickcap_core::backup;
use quickcap_core::config::QuickcapConfig;

use super::{is_remote, load};
use crate::render::pluralize;
use crate::utils::tui::with_spinner;

pub async fn run(config: &QuickcapConfig, file: &Path) -> Result<()> {
    let json = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let store = config.store()?;
    let existing = load(store.as_ref()).await?;
    let imported = backup::import(&existing, &json, Utc::now())?;

    let message = format!("Saving to {}", store.name());
    with_spinner(message, is_remote(store.as_ref()), store.replace_all(&imported.snapshot)).await?;

    println!(
        "{}",
        format!("  Imported {} {}", imported.count, pluralize("item", imported.count)).green()
    );
    Ok(())
}
