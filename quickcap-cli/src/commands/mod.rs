pub mod add;
pub mod config;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod open_link;
pub mod share;
pub mod sync;
pub mod tags;

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;
use quickcap_core::config::QuickcapConfig;
use quickcap_core::{CaptureError, Form, Item, Snapshot, Store};

use crate::render::Render;
use crate::utils::tui::with_spinner;

/// The user's local date, for quick-entry "today"/"tomorrow".
fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn is_remote(store: &dyn Store) -> bool {
    store.name() != "local"
}

async fn load(store: &dyn Store) -> Result<Snapshot> {
    let message = format!("Loading from {}", store.name());
    let snapshot = with_spinner(message, is_remote(store), store.load_all()).await?;
    tracing::debug!(store = store.name(), items = snapshot.items.len(), "loaded items");
    Ok(snapshot)
}

/// Look up `reference` (an id or `#N`) in `snapshot`.
fn resolve<'a>(snapshot: &'a Snapshot, reference: &str) -> Result<&'a Item> {
    snapshot
        .resolve(reference)
        .ok_or_else(|| CaptureError::NotFound(format!("No item matches '{}'", reference)).into())
}

/// Validate the form and save it. Field errors are printed and nothing
/// is written.
async fn save(config: &QuickcapConfig, mut form: Form, verb: &str) -> Result<()> {
    let draft = match form.submission() {
        Ok(draft) => draft,
        Err(CaptureError::Validation(errors)) => {
            eprintln!("{}", errors.render());
            bail!("Not saved: {} field(s) need attention", errors.len());
        }
        Err(e) => return Err(e.into()),
    };

    let store = config.store()?;
    let message = format!("Saving to {}", store.name());
    let item = with_spinner(message, is_remote(store.as_ref()), store.save(draft)).await?;
    tracing::debug!(store = store.name(), id = %item.id, "saved item");

    println!("{}", format!("  {}: {}", verb, item.title).green());
    println!("{}", item.render());
    Ok(())
}
