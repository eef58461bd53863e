//! JSON file store.
//!
//! The whole collection lives in one file:
//!
//! ```json
//! { "items": [...], "tags": [...], "updated_at": "...", "last_sync": "..." }
//! ```
//!
//! A missing file reads as an empty collection. Every write replaces the
//! file through a temporary sibling so a crash never leaves half a file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::CaptureResult;
use crate::item::{Draft, Item, TagSet};
use crate::store::{Deleted, Snapshot, Store};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalFile {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    tags: TagSet,
    updated_at: Option<DateTime<Utc>>,
    last_sync: Option<DateTime<Utc>>,
}

pub struct LocalStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the last successful sync finished, if ever.
    pub async fn last_sync(&self) -> CaptureResult<Option<DateTime<Utc>>> {
        Ok(self.read().await?.last_sync)
    }

    async fn read(&self) -> CaptureResult<LocalFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(LocalFile::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LocalFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, file: &LocalFile) -> CaptureResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(file)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), items = file.items.len(), "wrote local store");
        Ok(())
    }

    /// Read, let `f` change the snapshot, write back.
    async fn update<T>(&self, f: impl FnOnce(&mut Snapshot) -> CaptureResult<T>) -> CaptureResult<T> {
        let _guard = self.lock.lock().await;

        let file = self.read().await?;
        let mut snapshot = Snapshot {
            items: file.items,
            tags: file.tags,
        };
        let result = f(&mut snapshot)?;

        self.write(&LocalFile {
            items: snapshot.items,
            tags: snapshot.tags,
            updated_at: Some(Utc::now()),
            last_sync: file.last_sync,
        })
        .await?;
        Ok(result)
    }
}

#[async_trait]
impl Store for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn load_all(&self) -> CaptureResult<Snapshot> {
        let file = self.read().await?;
        Ok(Snapshot {
            items: file.items,
            tags: file.tags,
        })
    }

    async fn save(&self, draft: Draft) -> CaptureResult<Item> {
        self.update(|snapshot| snapshot.save(draft, Utc::now())).await
    }

    async fn delete(&self, id: &str) -> CaptureResult<Deleted> {
        self.update(|snapshot| Ok(snapshot.remove(id))).await
    }

    async fn replace_all(&self, snapshot: &Snapshot) -> CaptureResult<()> {
        self.update(|current| {
            *current = snapshot.clone();
            Ok(())
        })
        .await
    }

    async fn mark_synced(&self, at: DateTime<Utc>) -> CaptureResult<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;
        file.last_sync = Some(at);
        self.write(&file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptureError;
    use crate::store::tests::{now, task};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LocalStore {
        LocalStore::new(dir.path().join("nested").join("items.json"))
    }

    fn new_draft(title: &str, tags: &[&str]) -> Draft {
        let mut draft = Draft::from(task("tmp", title, tags));
        draft.clear_identity();
        draft
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let snapshot = store(&dir).load_all().await.unwrap();
        assert!(snapshot.items.is_empty());
        assert!(snapshot.tags.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let first = store.save(new_draft("first", &["home"])).await.unwrap();
        let second = store.save(new_draft("second", &["work"])).await.unwrap();

        let reopened = LocalStore::new(store.path());
        let snapshot = reopened.load_all().await.unwrap();
        let ids: Vec<_> = snapshot.items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);
        assert_eq!(snapshot.tags.sorted(), vec!["home", "work"]);
        assert_eq!(second.sequential_id, Some(2));
    }

    #[tokio::test]
    async fn update_keeps_id_and_created_at() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let created = store.save(new_draft("draft", &[])).await.unwrap();

        let mut edit = Draft::from(created.clone());
        edit.title = "final".into();
        edit.created_at = Some(now());
        let updated = store.save(edit).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(store.load_all().await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_missing_items() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let item = store.save(new_draft("gone soon", &["x"])).await.unwrap();

        assert_eq!(store.delete(&item.id).await.unwrap(), Deleted::Removed);
        assert_eq!(store.delete(&item.id).await.unwrap(), Deleted::NotFound);
        assert!(store.load_all().await.unwrap().tags.contains("x"));
    }

    #[tokio::test]
    async fn mark_synced_survives_later_writes() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert_eq!(store.last_sync().await.unwrap(), None);
        store.mark_synced(now()).await.unwrap();
        store.save(new_draft("after sync", &[])).await.unwrap();
        assert_eq!(store.last_sync().await.unwrap(), Some(now()));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        let err = store.load_all().await.unwrap_err();
        assert!(matches!(err, CaptureError::Serialization(_)));
    }
}
