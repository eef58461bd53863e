//! Client for the quickcap REST service.
//!
//! The server owns identity and timestamps in this mode; the client only
//! sends drafts. The tag index is derived server-side from the items, so
//! tags that no stored item carries are not kept.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};

use crate::error::{CaptureError, CaptureResult};
use crate::item::{Draft, Item, TagSet};
use crate::store::{Deleted, Snapshot, Store, transport_error};

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

pub struct RestStore {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        RestStore {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.header(API_KEY_HEADER, key),
            None => req,
        }
    }

    /// GET /api/items
    pub async fn list_items(&self) -> CaptureResult<Vec<Item>> {
        let resp = self
            .authed(self.http.get(format!("{}/api/items", self.base_url)))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(transport_error("Failed to fetch items", resp).await);
        }
        Ok(resp.json().await?)
    }

    /// GET /api/tags
    pub async fn list_tags(&self) -> CaptureResult<Vec<String>> {
        let resp = self
            .authed(self.http.get(format!("{}/api/tags", self.base_url)))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(transport_error("Failed to fetch tags", resp).await);
        }
        Ok(resp.json().await?)
    }

    /// POST /api/items
    pub async fn create_item(&self, draft: &Draft) -> CaptureResult<Item> {
        let resp = self
            .authed(self.http.post(format!("{}/api/items", self.base_url)))
            .json(draft)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(transport_error("Failed to create item", resp).await);
        }
        Ok(resp.json().await?)
    }

    /// PUT /api/items/:id
    pub async fn update_item(&self, id: &str, draft: &Draft) -> CaptureResult<Item> {
        let resp = self
            .authed(self.http.put(format!("{}/api/items/{}", self.base_url, id)))
            .json(draft)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(CaptureError::NotFound(id.to_string()));
        }
        if !resp.status().is_success() {
            return Err(transport_error("Failed to update item", resp).await);
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl Store for RestStore {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn load_all(&self) -> CaptureResult<Snapshot> {
        let items = self.list_items().await?;
        let tags = TagSet::from(self.list_tags().await?);
        Ok(Snapshot { items, tags })
    }

    /// Update when the draft has an id the server knows, create otherwise.
    async fn save(&self, draft: Draft) -> CaptureResult<Item> {
        if let Some(id) = draft.id.clone() {
            match self.update_item(&id, &draft).await {
                Err(CaptureError::NotFound(_)) => {
                    tracing::debug!(%id, "item unknown to server, creating it");
                }
                other => return other,
            }
        }
        self.create_item(&draft).await
    }

    async fn delete(&self, id: &str) -> CaptureResult<Deleted> {
        let resp = self
            .authed(
                self.http
                    .delete(format!("{}/api/items/{}", self.base_url, id)),
            )
            .send()
            .await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(Deleted::NotFound),
            s if s.is_success() => Ok(Deleted::Removed),
            _ => Err(transport_error("Failed to delete item", resp).await),
        }
    }

    /// Upsert every item in `snapshot`, then delete whatever else the
    /// server holds.
    async fn replace_all(&self, snapshot: &Snapshot) -> CaptureResult<()> {
        let existing = self.list_items().await?;
        let keep: HashSet<&str> = snapshot.items.iter().map(|i| i.id.as_str()).collect();

        // Oldest first so server-assigned display numbers follow creation order.
        for item in snapshot.items.iter().rev() {
            self.save(Draft::from(item.clone())).await?;
        }

        for item in existing.iter().filter(|i| !keep.contains(i.id.as_str())) {
            self.delete(&item.id).await?;
        }

        tracing::info!(
            items = snapshot.items.len(),
            "replaced server collection"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::task;

    #[tokio::test]
    async fn sends_api_key_and_reads_items_and_tags() {
        let mut server = mockito::Server::new_async().await;
        let items = server
            .mock("GET", "/api/items")
            .match_header(API_KEY_HEADER, "s3cret")
            .with_status(200)
            .with_body(serde_json::to_string(&vec![task("1", "one", &["b", "a"])]).unwrap())
            .create_async()
            .await;
        server
            .mock("GET", "/api/tags")
            .match_header(API_KEY_HEADER, "s3cret")
            .with_status(200)
            .with_body(r#"["a","b"]"#)
            .create_async()
            .await;

        let store = RestStore::new(server.url(), Some("s3cret".into()));
        let snapshot = store.load_all().await.unwrap();

        items.assert_async().await;
        assert_eq!(snapshot.items[0].id, "1");
        assert_eq!(snapshot.tags.sorted(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn unauthorized_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/items")
            .with_status(401)
            .with_body(r#"{"error":"Unauthorized"}"#)
            .create_async()
            .await;

        let store = RestStore::new(server.url(), None);
        match store.load_all().await.unwrap_err() {
            CaptureError::Transport(msg) => assert!(msg.ends_with("HTTP 401 - Unauthorized"), "{}", msg),
            other => panic!("Expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn save_with_unknown_id_falls_back_to_create() {
        let mut server = mockito::Server::new_async().await;
        let put = server
            .mock("PUT", "/api/items/abc")
            .with_status(404)
            .with_body(r#"{"error":"Item not found"}"#)
            .create_async()
            .await;
        let post = server
            .mock("POST", "/api/items")
            .with_status(201)
            .with_body(serde_json::to_string(&task("abc", "made", &[])).unwrap())
            .create_async()
            .await;

        let store = RestStore::new(server.url(), None);
        let item = store.save(Draft::from(task("abc", "made", &[]))).await.unwrap();

        put.assert_async().await;
        post.assert_async().await;
        assert_eq!(item.id, "abc");
    }

    #[tokio::test]
    async fn delete_maps_404_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/api/items/gone")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("DELETE", "/api/items/here")
            .with_status(204)
            .create_async()
            .await;

        let store = RestStore::new(server.url(), None);
        assert_eq!(store.delete("gone").await.unwrap(), Deleted::NotFound);
        assert_eq!(store.delete("here").await.unwrap(), Deleted::Removed);
    }
}
