//! Persistence behind one interface.
//!
//! A [`Store`] holds the item collection and the global tag index. Three
//! adapters implement it: a JSON file on disk ([`LocalStore`]), a hosted
//! whole-collection JSON document ([`BinStore`]) and the quickcap REST
//! service ([`RestStore`]). Nothing above this module knows which one is
//! active.

mod bin;
mod local;
mod rest;

pub use bin::{BinStore, DEFAULT_BIN_URL};
pub use local::LocalStore;
pub use rest::{API_KEY_HEADER, RestStore};

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};
use crate::item::{Draft, Item, TagSet, next_sequence};

/// The whole collection at one point in time, newest items first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub tags: TagSet,
}

/// Outcome of [`Store::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deleted {
    Removed,
    NotFound,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for messages ("local", "bin", "rest").
    fn name(&self) -> &'static str;

    /// Every item and the full tag index.
    async fn load_all(&self) -> CaptureResult<Snapshot>;

    /// Create or fully replace one item. The store stamps identity and
    /// timestamps; the returned item is what was stored.
    async fn save(&self, draft: Draft) -> CaptureResult<Item>;

    async fn delete(&self, id: &str) -> CaptureResult<Deleted>;

    /// Make the store hold exactly `snapshot`.
    async fn replace_all(&self, snapshot: &Snapshot) -> CaptureResult<()>;

    /// Record that a sync finished at `at`. Only stores that keep sync
    /// bookkeeping do anything here.
    async fn mark_synced(&self, _at: DateTime<Utc>) -> CaptureResult<()> {
        Ok(())
    }
}

/// Union by id. Local records keep their position and win on collision;
/// remote records with unknown ids follow in remote order. Tags are unioned.
pub fn merge(local: Snapshot, remote: Snapshot) -> Snapshot {
    let known: HashSet<String> = local.items.iter().map(|item| item.id.clone()).collect();

    let mut items = local.items;
    items.extend(
        remote
            .items
            .into_iter()
            .filter(|item| !known.contains(&item.id)),
    );

    let mut tags = local.tags;
    tags.union_with(&remote.tags);

    Snapshot { items, tags }
}

impl Snapshot {
    pub fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Look an item up by id or by display number (`#12` or `12`).
    pub fn resolve(&self, reference: &str) -> Option<&Item> {
        if let Some(item) = self.find(reference) {
            return Some(item);
        }
        let number: u64 = reference.trim_start_matches('#').parse().ok()?;
        self.items
            .iter()
            .find(|item| item.sequential_id == Some(number))
    }

    /// Stamp `draft` into the collection.
    ///
    /// A draft whose id matches an existing item replaces it in place;
    /// anything else is added to the front. The item's tags join the index.
    pub fn save(&mut self, draft: Draft, now: DateTime<Utc>) -> CaptureResult<Item> {
        let position = draft
            .id
            .as_deref()
            .and_then(|id| self.items.iter().position(|item| item.id == id));
        let previous = position.map(|i| &self.items[i]);

        let item = Item::stamp(draft, previous, now, next_sequence(&self.items))?;
        self.tags.union_with(&item.tags);

        match position {
            Some(i) => self.items[i] = item.clone(),
            None => self.items.insert(0, item.clone()),
        }
        Ok(item)
    }

    /// Remove an item. The tag index is left alone.
    pub fn remove(&mut self, id: &str) -> Deleted {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() < before {
            Deleted::Removed
        } else {
            Deleted::NotFound
        }
    }
}

/// Turn a non-2xx HTTP response into a transport error, keeping the
/// server's `{"error": ...}` message when there is one.
pub(crate) async fn transport_error(context: &str, resp: reqwest::Response) -> CaptureError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);

    if detail.trim().is_empty() {
        CaptureError::Transport(format!("{}: HTTP {}", context, status.as_u16()))
    } else {
        CaptureError::Transport(format!(
            "{}: HTTP {} - {}",
            context,
            status.as_u16(),
            detail.trim()
        ))
    }
}
