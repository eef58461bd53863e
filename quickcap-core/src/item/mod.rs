//! The canonical item record: a task or an event sharing a common envelope.
//!
//! `Item` is always valid. Every invariant (exactly one due field for tasks,
//! all-day events never carrying a duration, a real IANA timezone, ...) is
//! checked when converting from a [`Draft`], which is also the wire shape
//! used by every backend.

mod draft;
mod fields;
mod tags;

pub use draft::Draft;
pub use fields::{DeadlineType, ItemType, Priority, Status};
pub use tags::TagSet;

use std::fmt;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// A stored task or event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Draft", into = "Draft")]
pub struct Item {
    pub id: String,
    /// Human-facing display number (`#12`), assigned once by the store.
    pub sequential_id: Option<u64>,
    pub title: String,
    pub tags: TagSet,
    pub notes: Option<String>,
    pub urls: Vec<String>,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: Status,
    pub priority: Option<Priority>,
    pub dependencies: Vec<String>,
    /// Free text such as "every other Monday"; never parsed into a rule.
    pub recurrence: Option<String>,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Task(Task),
    Event(Event),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub due: Due,
    pub effort_min: u32,
    pub deadline: DeadlineType,
    pub earliest_start: Option<NaiveDate>,
    pub subtasks: Vec<String>,
}

/// When a task is due: a specific date, or some time in a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    Date(NaiveDate),
    /// Always a Sunday.
    Week(NaiveDate),
}

impl Due {
    pub fn date(&self) -> NaiveDate {
        match self {
            Due::Date(d) | Due::Week(d) => *d,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub start: EventStart,
    pub span: Span,
    pub location: Option<String>,
    pub attendees: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    AllDay,
    Minutes(u32),
}

impl Span {
    pub fn duration_min(&self) -> Option<u32> {
        match self {
            Span::AllDay => None,
            Span::Minutes(m) => Some(*m),
        }
    }
}

/// Event start instant. Quick entry and the form produce floating local
/// times (interpreted in the item's timezone); records written by other
/// clients may carry an explicit offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStart {
    Floating(NaiveDateTime),
    Fixed(DateTime<FixedOffset>),
}

const FLOATING_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

impl EventStart {
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(EventStart::Fixed(dt));
        }
        FLOATING_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(EventStart::Floating)
    }

    /// Local wall-clock time of the start.
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            EventStart::Floating(dt) => *dt,
            EventStart::Fixed(dt) => dt.naive_local(),
        }
    }
}

impl fmt::Display for EventStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStart::Floating(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            EventStart::Fixed(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl Item {
    pub fn item_type(&self) -> ItemType {
        match self.kind {
            ItemKind::Task(_) => ItemType::Task,
            ItemKind::Event(_) => ItemType::Event,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_closed()
    }

    /// Build the stored version of `draft`.
    ///
    /// This is the single place identity and timestamps are assigned:
    /// - the id of `previous` is kept; otherwise the draft's id, otherwise a new UUID
    /// - `created_at` is kept from `previous`, otherwise `now`
    /// - `updated_at` is `now`, but always later than the previous `updated_at`
    /// - `sequential_id` is kept from `previous`, otherwise `next_sequence`
    pub fn stamp(
        mut draft: Draft,
        previous: Option<&Item>,
        now: DateTime<Utc>,
        next_sequence: u64,
    ) -> CaptureResult<Item> {
        match previous {
            Some(prev) => {
                draft.id = Some(prev.id.clone());
                draft.created_at = Some(prev.created_at);
                draft.sequential_id = prev.sequential_id.or(Some(next_sequence));
                draft.updated_at = Some(now.max(prev.updated_at + Duration::milliseconds(1)));
            }
            None => {
                let id = draft
                    .id
                    .take()
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(new_id);
                draft.id = Some(id);
                draft.created_at = Some(now);
                draft.updated_at = Some(now);
                draft.sequential_id = Some(next_sequence);
            }
        }

        draft.title = draft.title.trim().to_string();
        Item::try_from(draft)
    }
}

/// A fresh random identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The display number the next created item receives.
pub fn next_sequence<'a>(items: impl IntoIterator<Item = &'a Item>) -> u64 {
    items
        .into_iter()
        .filter_map(|item| item.sequential_id)
        .max()
        .unwrap_or(0)
        + 1
}

fn invalid(msg: impl Into<String>) -> CaptureError {
    CaptureError::InvalidItem(msg.into())
}

impl TryFrom<Draft> for Item {
    type Error = CaptureError;

    fn try_from(draft: Draft) -> Result<Self, Self::Error> {
        let id = draft
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid("missing id"))?;

        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(invalid(format!("item {} has an empty title", id)));
        }

        let timezone = draft
            .timezone
            .ok_or_else(|| invalid(format!("item {} has no timezone", id)))?;
        if timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(invalid(format!(
                "item {} has unknown timezone '{}'",
                id, timezone
            )));
        }

        let created_at = draft
            .created_at
            .ok_or_else(|| invalid(format!("item {} has no created_at", id)))?;
        let updated_at = draft
            .updated_at
            .ok_or_else(|| invalid(format!("item {} has no updated_at", id)))?;

        let item_type = draft
            .item_type
            .ok_or_else(|| invalid(format!("item {} has no type", id)))?;

        let kind = match item_type {
            ItemType::Task => {
                let due = match (draft.due_date, draft.due_week_start) {
                    (Some(date), None) => Due::Date(date),
                    (None, Some(week)) => Due::Week(week_start(week)),
                    (Some(_), Some(_)) => {
                        return Err(invalid(format!(
                            "task {} has both a due date and a due week",
                            id
                        )));
                    }
                    (None, None) => {
                        return Err(invalid(format!("task {} has no due date or week", id)));
                    }
                };
                let effort_min = draft
                    .effort_min
                    .filter(|m| *m > 0)
                    .ok_or_else(|| invalid(format!("task {} has no effort", id)))?;
                let deadline = draft
                    .deadline_type
                    .ok_or_else(|| invalid(format!("task {} has no deadline type", id)))?;

                ItemKind::Task(Task {
                    due,
                    effort_min,
                    deadline,
                    earliest_start: draft.earliest_start,
                    subtasks: draft.subtasks.unwrap_or_default(),
                })
            }
            ItemType::Event => {
                let raw_start = draft
                    .start_iso
                    .ok_or_else(|| invalid(format!("event {} has no start", id)))?;
                let start = EventStart::parse(&raw_start).ok_or_else(|| {
                    invalid(format!("event {} has unreadable start '{}'", id, raw_start))
                })?;
                let span = if draft.all_day.unwrap_or(false) {
                    Span::AllDay
                } else {
                    draft
                        .duration_min
                        .filter(|m| *m > 0)
                        .map(Span::Minutes)
                        .ok_or_else(|| invalid(format!("event {} has no duration", id)))?
                };

                ItemKind::Event(Event {
                    start,
                    span,
                    location: draft.location,
                    attendees: draft.attendees.unwrap_or_default(),
                })
            }
        };

        Ok(Item {
            id,
            sequential_id: draft.sequential_id,
            title,
            tags: draft.tags,
            notes: draft.notes,
            urls: draft.urls.unwrap_or_default(),
            timezone,
            created_at,
            updated_at,
            status: draft.status.unwrap_or_default(),
            priority: draft.priority,
            dependencies: draft.dependencies.unwrap_or_default(),
            recurrence: draft.recurrence,
            kind,
        })
    }
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() { None } else { Some(values) }
}

impl From<Item> for Draft {
    fn from(item: Item) -> Self {
        let mut draft = Draft {
            id: Some(item.id),
            item_type: None,
            title: item.title,
            priority: item.priority,
            status: Some(item.status),
            recurrence: item.recurrence,
            dependencies: non_empty(item.dependencies),
            tags: item.tags,
            notes: item.notes,
            urls: non_empty(item.urls),
            timezone: Some(item.timezone),
            sequential_id: item.sequential_id,
            created_at: Some(item.created_at),
            updated_at: Some(item.updated_at),
            ..Draft::default()
        };

        match item.kind {
            ItemKind::Task(task) => {
                draft.item_type = Some(ItemType::Task);
                match task.due {
                    Due::Date(d) => draft.due_date = Some(d),
                    Due::Week(w) => draft.due_week_start = Some(w),
                }
                draft.effort_min = Some(task.effort_min);
                draft.deadline_type = Some(task.deadline);
                draft.earliest_start = task.earliest_start;
                draft.subtasks = non_empty(task.subtasks);
            }
            ItemKind::Event(event) => {
                draft.item_type = Some(ItemType::Event);
                draft.start_iso = Some(event.start.to_string());
                draft.all_day = Some(event.span == Span::AllDay);
                draft.duration_min = event.span.duration_min();
                draft.location = event.location;
                draft.attendees = non_empty(event.attendees);
            }
        }

        draft
    }
}
