use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use quickcap_core::config::QuickcapConfig;
use quickcap_core::Deleted;

use super::{is_remote, load, resolve};
use crate::utils::tui::with_spinner;

pub async fn run(config: &QuickcapConfig, reference: &str) -> Result<()> {
    let store = config.store()?;
    let snapshot = load(store.as_ref()).await?;
    let item = resolve(&snapshot, reference)?;

    let message = format!("Deleting from {}", store.name());
    let outcome = with_spinner(message, is_remote(store.as_ref()), store.delete(&item.id)).await?;

    match outcome {
        Deleted::Removed => {
            println!("{}", format!("  Deleted: {}", item.title).green());
            Ok(())
        }
        // Gone between the load and the delete.
        Deleted::NotFound => bail!("Item {} no longer exists", item.id),
    }
}
