//! Whole-collection sync between the local store and a remote one.
//!
//! - `pull` replaces the local collection with the remote one
//! - `push` replaces the remote collection with the local one
//! - `merge` unions both by id (local wins) and writes the result to both
//!
//! Every verb works through [`Store`] alone and stamps `last_sync` on the
//! local side when it succeeds.

mod status;

pub use status::{StatusBanner, SyncStatus};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{CaptureError, CaptureResult};
use crate::store::{Snapshot, Store, merge as merge_snapshots};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Push,
    Pull,
    Merge,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Push => "push",
            Direction::Pull => "pull",
            Direction::Merge => "merge",
        };
        f.write_str(s)
    }
}

impl FromStr for Direction {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "push" => Ok(Direction::Push),
            "pull" => Ok(Direction::Pull),
            "merge" => Ok(Direction::Merge),
            other => Err(CaptureError::Parse(format!(
                "unknown sync direction '{}' (expected push, pull or merge)",
                other
            ))),
        }
    }
}

/// What a finished sync left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub direction: Direction,
    pub items: usize,
    pub tags: usize,
    pub finished_at: DateTime<Utc>,
}

pub async fn run(direction: Direction, local: &dyn Store, remote: &dyn Store) -> CaptureResult<SyncReport> {
    tracing::info!(%direction, local = local.name(), remote = remote.name(), "sync started");

    let result = match direction {
        Direction::Pull => {
            let snapshot = remote.load_all().await?;
            local.replace_all(&snapshot).await?;
            snapshot
        }
        Direction::Push => {
            let snapshot = local.load_all().await?;
            remote.replace_all(&snapshot).await?;
            snapshot
        }
        Direction::Merge => {
            let theirs = remote.load_all().await?;
            let ours = local.load_all().await?;
            let merged = merge_snapshots(ours, theirs);
            remote.replace_all(&merged).await?;
            local.replace_all(&merged).await?;
            merged
        }
    };

    finish(direction, local, &result).await
}

pub async fn pull(local: &dyn Store, remote: &dyn Store) -> CaptureResult<SyncReport> {
    run(Direction::Pull, local, remote).await
}

pub async fn push(local: &dyn Store, remote: &dyn Store) -> CaptureResult<SyncReport> {
    run(Direction::Push, local, remote).await
}

pub async fn merge(local: &dyn Store, remote: &dyn Store) -> CaptureResult<SyncReport> {
    run(Direction::Merge, local, remote).await
}

async fn finish(direction: Direction, local: &dyn Store, snapshot: &Snapshot) -> CaptureResult<SyncReport> {
    let finished_at = Utc::now();
    local.mark_synced(finished_at).await?;

    tracing::info!(%direction, items = snapshot.items.len(), "sync finished");
    Ok(SyncReport {
        direction,
        items: snapshot.items.len(),
        tags: snapshot.tags.len(),
        finished_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;
    use crate::store::tests::task;
    use tempfile::TempDir;

    async fn seeded(dir: &TempDir, name: &str, snapshot: Snapshot) -> LocalStore {
        let store = LocalStore::new(dir.path().join(name));
        store.replace_all(&snapshot).await.unwrap();
        store
    }

    fn snapshot(items: Vec<crate::item::Item>, tags: &[&str]) -> Snapshot {
        Snapshot {
            items,
            tags: tags.iter().copied().collect(),
        }
    }

    fn titles(snapshot: &Snapshot) -> Vec<&str> {
        snapshot.items.iter().map(|i| i.title.as_str()).collect()
    }

    #[tokio::test]
    async fn merge_writes_the_union_to_both_sides() {
        let dir = TempDir::new().unwrap();
        let local = seeded(
            &dir,
            "local.json",
            snapshot(vec![task("1", "one", &[]), task("2", "two mine", &[])], &["a"]),
        )
        .await;
        let remote = seeded(
            &dir,
            "remote.json",
            snapshot(vec![task("2", "two theirs", &[]), task("3", "three", &[])], &["b"]),
        )
        .await;

        let report = merge(&local, &remote).await.unwrap();
        assert_eq!(report.items, 3);
        assert_eq!(report.tags, 2);

        let ours = local.load_all().await.unwrap();
        let theirs = remote.load_all().await.unwrap();
        assert_eq!(titles(&ours), vec!["one", "two mine", "three"]);
        assert_eq!(ours, theirs);
        assert_eq!(local.last_sync().await.unwrap(), Some(report.finished_at));
    }

    #[tokio::test]
    async fn pull_and_push_replace_one_side() {
        let dir = TempDir::new().unwrap();
        let local = seeded(&dir, "l.json", snapshot(vec![task("1", "local", &[])], &[])).await;
        let remote = seeded(&dir, "r.json", snapshot(vec![task("9", "remote", &[])], &["r"])).await;

        pull(&local, &remote).await.unwrap();
        assert_eq!(titles(&local.load_all().await.unwrap()), vec!["remote"]);

        local.save(crate::item::Draft::from(task("5", "new local", &[]))).await.unwrap();
        push(&local, &remote).await.unwrap();
        assert_eq!(
            titles(&remote.load_all().await.unwrap()),
            vec!["new local", "remote"]
        );
        assert!(remote.last_sync().await.unwrap().is_none());
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("Merge".parse::<Direction>().unwrap(), Direction::Merge);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
