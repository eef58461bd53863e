//! Hosted JSON document store.
//!
//! The collection is one JSON document `{items, tags, updated_at}` kept in
//! a "bin" on a JSONBin-style service:
//!
//! - `GET  {url}/b/{bin_id}/latest` reads it (`X-Bin-Meta: false` returns
//!   the bare document; 404 means nothing has been pushed yet)
//! - `PUT  {url}/b/{bin_id}` replaces it (`X-Bin-Versioning: false`)
//!
//! Both send the access key in `X-Access-Key`. Single-item saves and
//! deletes are read-modify-write cycles over the whole document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::CaptureResult;
use crate::item::{Draft, Item, TagSet};
use crate::store::{Deleted, Snapshot, Store, transport_error};

pub const DEFAULT_BIN_URL: &str = "https://api.jsonbin.io/v3";

#[derive(Debug, Serialize, Deserialize)]
struct BinDocument {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    tags: TagSet,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

pub struct BinStore {
    http: reqwest::Client,
    base_url: String,
    bin_id: String,
    access_key: String,
}

impl BinStore {
    pub fn new(
        base_url: impl Into<String>,
        bin_id: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        BinStore {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bin_id: bin_id.into(),
            access_key: access_key.into(),
        }
    }

    async fn pull(&self) -> CaptureResult<Snapshot> {
        let url = format!("{}/b/{}/latest", self.base_url, self.bin_id);
        tracing::debug!(%url, "fetching bin");

        let resp = self
            .http
            .get(&url)
            .header("X-Access-Key", &self.access_key)
            .header("X-Bin-Meta", "false")
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            tracing::info!(bin = %self.bin_id, "bin not found, treating as empty");
            return Ok(Snapshot::default());
        }
        if !resp.status().is_success() {
            return Err(transport_error("Failed to fetch", resp).await);
        }

        let doc: BinDocument = resp.json().await?;
        Ok(Snapshot {
            items: doc.items,
            tags: doc.tags,
        })
    }

    async fn push(&self, snapshot: &Snapshot) -> CaptureResult<()> {
        let url = format!("{}/b/{}", self.base_url, self.bin_id);
        let doc = BinDocument {
            items: snapshot.items.clone(),
            tags: snapshot.tags.clone(),
            updated_at: Some(Utc::now()),
        };
        tracing::debug!(%url, items = doc.items.len(), "pushing bin");

        let resp = self
            .http
            .put(&url)
            .header("X-Access-Key", &self.access_key)
            .header("X-Bin-Versioning", "false")
            .json(&doc)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(transport_error("Failed to push", resp).await);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for BinStore {
    fn name(&self) -> &'static str {
        "bin"
    }

    async fn load_all(&self) -> CaptureResult<Snapshot> {
        self.pull().await
    }

    async fn save(&self, draft: Draft) -> CaptureResult<Item> {
        let mut snapshot = self.pull().await?;
        let item = snapshot.save(draft, Utc::now())?;
        self.push(&snapshot).await?;
        Ok(item)
    }

    async fn delete(&self, id: &str) -> CaptureResult<Deleted> {
        let mut snapshot = self.pull().await?;
        let outcome = snapshot.remove(id);
        if outcome == Deleted::Removed {
            self.push(&snapshot).await?;
        }
        Ok(outcome)
    }

    async fn replace_all(&self, snapshot: &Snapshot) -> CaptureResult<()> {
        self.push(snapshot).await
    }
}
