//! The flat, all-optional record shape.
//!
//! A `Draft` is what the capture form edits, what the quick-entry parser
//! patches and what every backend stores on the wire. A stamped, validated
//! `Item` converts to and from it losslessly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::item::fields::{DeadlineType, ItemType, Priority, Status};
use crate::item::tags::TagSet;
use crate::item::week_start;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<ItemType>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    // Event fields
    pub start_iso: Option<String>,
    pub duration_min: Option<u32>,
    pub all_day: Option<bool>,
    pub location: Option<String>,
    pub attendees: Option<Vec<String>>,

    // Task fields
    pub due_date: Option<NaiveDate>,
    pub due_week_start: Option<NaiveDate>,
    pub effort_min: Option<u32>,
    pub deadline_type: Option<DeadlineType>,
    pub earliest_start: Option<NaiveDate>,
    pub subtasks: Option<Vec<String>>,

    // Shared fields
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub recurrence: Option<String>,
    pub dependencies: Option<Vec<String>>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: TagSet,
    pub notes: Option<String>,
    pub urls: Option<Vec<String>>,
    pub timezone: Option<String>,

    // Assigned by the store
    pub sequential_id: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Draft {
    /// A blank draft as the capture form starts out.
    pub fn blank(timezone: impl Into<String>) -> Self {
        Draft {
            status: Some(Status::Open),
            timezone: Some(timezone.into()),
            ..Draft::default()
        }
    }

    /// Due on a specific date. Clears any due week.
    pub fn set_due_date(&mut self, date: NaiveDate) {
        self.due_date = Some(date);
        self.due_week_start = None;
    }

    /// Due some time in the week containing `date`. Clears any due date.
    pub fn set_due_week(&mut self, date: NaiveDate) {
        self.due_week_start = Some(week_start(date));
        self.due_date = None;
    }

    /// Remove every field that belongs to the other item type.
    pub fn retain_fields_for(&mut self, item_type: ItemType) {
        match item_type {
            ItemType::Task => {
                self.start_iso = None;
                self.duration_min = None;
                self.all_day = None;
                self.location = None;
                self.attendees = None;
            }
            ItemType::Event => {
                self.due_date = None;
                self.due_week_start = None;
                self.effort_min = None;
                self.deadline_type = None;
            }
        }
    }

    /// Drop identity, display number and timestamps so a store treats this
    /// as a brand new record.
    pub fn clear_identity(&mut self) {
        self.id = None;
        self.sequential_id = None;
        self.created_at = None;
        self.updated_at = None;
    }
}
