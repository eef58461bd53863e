use anyhow::Result;
use owo_colors::OwoColorize;
use quickcap_core::TagSet;
use quickcap_core::config::QuickcapConfig;

use super::load;

pub async fn run(config: &QuickcapConfig, matching: Option<&str>) -> Result<()> {
    let store = config.store()?;
    let snapshot = load(store.as_ref()).await?;

    let tags: Vec<String> = match matching {
        Some(query) => snapshot
            .tags
            .suggest(query, &TagSet::new())
            .into_iter()
            .map(str::to_string)
            .collect(),
        None => snapshot.tags.sorted(),
    };

    if tags.is_empty() {
        println!("{}", "No tags found".dimmed());
        return Ok(());
    }

    for tag in tags {
        println!("#{}", tag);
    }
    Ok(())
}
