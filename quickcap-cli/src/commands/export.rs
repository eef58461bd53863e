use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use quickcap_core::backup::Backup;
use quickcap_core::config::QuickcapConfig;

use super::load;
use crate::render::pluralize;

pub async fn run(config: &QuickcapConfig, out: Option<&Path>) -> Result<()> {
    let store = config.store()?;
    let snapshot = load(store.as_ref()).await?;
    let json = Backup::new(&snapshot, Utc::now()).to_json()?;

    match out {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let count = snapshot.items.len();
            println!(
                "{}",
                format!("  Exported {} {} to {}", count, pluralize("item", count), path.display())
                    .green()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
