//! SQLite storage for items.
//!
//! Each item is one row. The full record is kept as JSON in `data`; the
//! other columns exist for ordering, filtering and display-number
//! assignment.

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use quickcap_core::Item;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::info;

/// Open (creating if needed) the database at `database_url` and make sure
/// the schema exists.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database {}", database_url))?;

    init_schema(&pool).await?;
    info!("Connected to database: {}", database_url);
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id TEXT PRIMARY KEY,
            sequential_id INTEGER,
            item_type TEXT NOT NULL,
            title TEXT NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            data TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create items table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS items_created_at ON items (created_at)")
        .execute(pool)
        .await
        .context("Failed to create items index")?;

    Ok(())
}

// Fixed-width UTC timestamps so text ordering is chronological.
fn timestamp(t: chrono::DateTime<chrono::Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode(data: &str) -> Result<Item> {
    serde_json::from_str(data).context("Stored item is not a valid record")
}

/// All items, newest `created_at` first. Closed items are skipped unless
/// `include_closed`.
pub async fn list_items<'e>(db: impl SqliteExecutor<'e>, include_closed: bool) -> Result<Vec<Item>> {
    let sql = if include_closed {
        "SELECT data FROM items ORDER BY created_at DESC, sequential_id DESC"
    } else {
        "SELECT data FROM items WHERE status NOT IN ('Completed', 'Canceled') \
         ORDER BY created_at DESC, sequential_id DESC"
    };

    let rows: Vec<(String,)> = sqlx::query_as(sql).fetch_all(db).await?;
    rows.iter().map(|(data,)| decode(data)).collect()
}

pub async fn get_item<'e>(db: impl SqliteExecutor<'e>, id: &str) -> Result<Option<Item>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT data FROM items WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    row.map(|(data,)| decode(&data)).transpose()
}

/// The display number the next new item gets.
pub async fn next_sequence<'e>(db: impl SqliteExecutor<'e>) -> Result<u64> {
    let max: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(sequential_id), 0) FROM items")
        .fetch_one(db)
        .await?;
    Ok(u64::try_from(max).unwrap_or(0) + 1)
}

/// Insert or overwrite the row for `item.id`.
pub async fn put_item<'e>(db: impl SqliteExecutor<'e>, item: &Item) -> Result<()> {
    let data = serde_json::to_string(item)?;
    let sequential_id = item.sequential_id.and_then(|n| i64::try_from(n).ok());

    sqlx::query(
        r#"
        INSERT INTO items (id, sequential_id, item_type, title, status, created_at, updated_at, data)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            sequential_id = excluded.sequential_id,
            item_type = excluded.item_type,
            title = excluded.title,
            status = excluded.status,
            updated_at = excluded.updated_at,
            data = excluded.data
        "#,
    )
    .bind(&item.id)
    .bind(sequential_id)
    .bind(item.item_type().to_string())
    .bind(&item.title)
    .bind(item.status.label())
    .bind(timestamp(item.created_at))
    .bind(timestamp(item.updated_at))
    .bind(data)
    .execute(db)
    .await?;

    Ok(())
}

/// Returns false when there was no such item.
pub async fn delete_item<'e>(db: impl SqliteExecutor<'e>, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM items WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Every tag on any stored item, sorted and deduplicated.
pub async fn all_tags<'e>(db: impl SqliteExecutor<'e>) -> Result<Vec<String>> {
    let items = list_items(db, true).await?;
    let tags: BTreeSet<String> = items
        .iter()
        .flat_map(|item| item.tags.iter().map(str::to_string))
        .collect();
    Ok(tags.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use quickcap_core::{DeadlineType, Draft, ItemType, Status};

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    fn item(id: &str, hour: u32, status: Status, tags: &[&str]) -> Item {
        let draft = Draft {
            id: Some(id.to_string()),
            item_type: Some(ItemType::Task),
            title: format!("task {}", id),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 21),
            effort_min: Some(15),
            deadline_type: Some(DeadlineType::Hard),
            status: Some(status),
            tags: tags.iter().copied().collect(),
            ..Draft::blank("UTC")
        };
        let now = Utc.with_ymd_and_hms(2025, 3, 20, hour, 0, 0).unwrap();
        Item::stamp(draft, None, now, u64::from(hour)).unwrap()
    }

    #[tokio::test]
    async fn lists_newest_first_and_filters_closed() {
        let pool = setup_test_db().await;
        put_item(&pool, &item("a", 8, Status::Open, &[])).await.unwrap();
        put_item(&pool, &item("b", 10, Status::Completed, &[])).await.unwrap();
        put_item(&pool, &item("c", 9, Status::Blocked, &[])).await.unwrap();

        let all = list_items(&pool, true).await.unwrap();
        let ids: Vec<_> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        let open = list_items(&pool, false).await.unwrap();
        let ids: Vec<_> = open.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn put_overwrites_and_delete_reports_presence() {
        let pool = setup_test_db().await;
        let mut original = item("x", 8, Status::Open, &[]);
        put_item(&pool, &original).await.unwrap();

        original.title = "renamed".into();
        put_item(&pool, &original).await.unwrap();
        let stored = get_item(&pool, "x").await.unwrap().unwrap();
        assert_eq!(stored.title, "renamed");

        assert!(delete_item(&pool, "x").await.unwrap());
        assert!(!delete_item(&pool, "x").await.unwrap());
        assert!(get_item(&pool, "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sequence_and_tags_follow_stored_items() {
        let pool = setup_test_db().await;
        assert_eq!(next_sequence(&pool).await.unwrap(), 1);

        put_item(&pool, &item("a", 3, Status::Open, &["zeta", "alpha"])).await.unwrap();
        put_item(&pool, &item("b", 7, Status::Open, &["alpha", "mid"])).await.unwrap();

        assert_eq!(next_sequence(&pool).await.unwrap(), 8);
        assert_eq!(all_tags(&pool).await.unwrap(), vec!["alpha", "mid", "zeta"]);
    }
}
