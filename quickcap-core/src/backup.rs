//! JSON backup and restore.
//!
//! The export document is `{items, tags, exported_at}`. Import also accepts
//! `updated_at` in place of `exported_at`, which is the shape of a bin
//! document or a share-link payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};
use crate::item::{Draft, Item, TagSet, next_sequence};
use crate::store::Snapshot;

#[derive(Debug, Clone, Serialize)]
pub struct Backup {
    pub items: Vec<Item>,
    pub tags: TagSet,
    pub exported_at: DateTime<Utc>,
}

impl Backup {
    pub fn new(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        Backup {
            items: snapshot.items.clone(),
            tags: snapshot.tags.clone(),
            exported_at: now,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> CaptureResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// Items are read as drafts so that identity and timestamps in the file
// never have to be valid; they are replaced anyway.
#[derive(Deserialize)]
struct IncomingBackup {
    items: Option<Vec<Draft>>,
    #[serde(default)]
    tags: Option<TagSet>,
}

/// Outcome of a successful [`import`].
#[derive(Debug)]
pub struct Imported {
    pub snapshot: Snapshot,
    pub count: usize,
}

/// Merge a backup document into `existing`.
///
/// Every incoming item gets a fresh id and fresh timestamps; imported items
/// go in front of the existing ones, in file order. Tags are unioned. If
/// anything in the document is unusable nothing is imported.
pub fn import(existing: &Snapshot, json: &str, now: DateTime<Utc>) -> CaptureResult<Imported> {
    let incoming: IncomingBackup = serde_json::from_str(json)
        .map_err(|e| CaptureError::Parse(format!("Invalid JSON format: {}", e)))?;

    let drafts = incoming
        .items
        .ok_or_else(|| CaptureError::Parse("Backup has no items list".into()))?;

    let mut sequence = next_sequence(&existing.items);
    let mut imported = Vec::with_capacity(drafts.len());
    for (index, mut draft) in drafts.into_iter().enumerate() {
        draft.clear_identity();
        let item = Item::stamp(draft, None, now, sequence)
            .map_err(|e| CaptureError::Parse(format!("Item {} in backup: {}", index + 1, e)))?;
        sequence += 1;
        imported.push(item);
    }

    let count = imported.len();
    let mut tags = existing.tags.clone();
    for item in &imported {
        tags.union_with(&item.tags);
    }
    if let Some(extra) = incoming.tags {
        tags.union_with(&extra);
    }

    imported.extend(existing.items.iter().cloned());
    tracing::info!(count, "imported backup");

    Ok(Imported {
        snapshot: Snapshot {
            items: imported,
            tags,
        },
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{now, task};
    use std::collections::HashSet;

    fn existing() -> Snapshot {
        Snapshot {
            items: vec![task("keep", "already here", &["home"])],
            tags: ["home"].into_iter().collect(),
        }
    }

    #[test]
    fn import_mints_distinct_fresh_ids() {
        let source = Snapshot {
            items: vec![
                task("a", "first", &["x"]),
                task("b", "second", &[]),
                task("c", "third", &["y"]),
            ],
            tags: ["x", "y", "z"].into_iter().collect(),
        };
        let json = Backup::new(&source, now()).to_json().unwrap();
        let later = now() + chrono::Duration::hours(1);

        let imported = import(&existing(), &json, later).unwrap();
        assert_eq!(imported.count, 3);

        let new_ids: Vec<&str> = imported.snapshot.items[..3].iter().map(|i| i.id.as_str()).collect();
        let unique: HashSet<&str> = new_ids.iter().copied().collect();
        assert_eq!(unique.len(), 3);
        for old in ["a", "b", "c", "keep"] {
            assert!(!unique.contains(old));
        }

        let titles: Vec<&str> = imported.snapshot.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third", "already here"]);
        assert!(imported.snapshot.items[..3].iter().all(|i| i.created_at == later));
        assert_eq!(imported.snapshot.tags.sorted(), vec!["home", "x", "y", "z"]);
    }

    #[test]
    fn accepts_updated_at_documents() {
        let json = r#"{"items":[],"tags":["a"],"updated_at":"2025-01-01T00:00:00Z"}"#;
        let imported = import(&Snapshot::default(), json, now()).unwrap();
        assert_eq!(imported.count, 0);
        assert!(imported.snapshot.tags.contains("a"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = import(&existing(), "{ nope", now()).unwrap_err();
        assert!(matches!(err, CaptureError::Parse(_)));
    }

    #[test]
    fn missing_items_is_parse_error() {
        let err = import(&existing(), r#"{"tags":["a"]}"#, now()).unwrap_err();
        assert!(matches!(err, CaptureError::Parse(_)));
    }

    #[test]
    fn one_bad_item_aborts_the_whole_import() {
        let json = r#"{"items":[
            {"type":"task","title":"ok","due_date":"2025-03-21","effort_min":10,"deadline_type":"soft","timezone":"UTC"},
            {"type":"task","title":"no effort","due_date":"2025-03-21","deadline_type":"soft","timezone":"UTC"}
        ]}"#;
        match import(&existing(), json, now()).unwrap_err() {
            CaptureError::Parse(msg) => assert!(msg.starts_with("Item 2"), "{}", msg),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }
}
