use anyhow::Result;
use owo_colors::OwoColorize;
use quickcap_core::config::QuickcapConfig;

use super::load;
use crate::render::Render;

pub async fn run(config: &QuickcapConfig, all: bool, tag: Option<&str>) -> Result<()> {
    let store = config.store()?;
    let snapshot = load(store.as_ref()).await?;

    let items: Vec<_> = snapshot
        .items
        .iter()
        .filter(|item| all || !item.is_closed())
        .filter(|item| tag.is_none_or(|t| item.tags.contains(t)))
        .collect();

    if items.is_empty() {
        println!("{}", "No items found".dimmed());
        return Ok(());
    }

    for item in items {
        println!("{}", item.render());
    }
    Ok(())
}
