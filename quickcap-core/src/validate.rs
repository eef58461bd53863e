//! Required-field rules for a draft, conditioned on the item type.

use std::collections::BTreeMap;
use std::fmt;

use crate::item::{Draft, ItemType};

/// Field name → human-readable message. Empty means the draft can be saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn add(&mut self, field: &'static str, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Check `draft` as an item of type `item_type`.
///
/// Zero counts as missing for effort and duration.
pub fn validate(draft: &Draft, item_type: ItemType) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if draft.title.trim().is_empty() {
        errors.add("title", "Title is required");
    }

    match item_type {
        ItemType::Task => {
            if draft.due_date.is_none() && draft.due_week_start.is_none() {
                errors.add("due", "Due date or week is required");
            }
            if draft.effort_min.unwrap_or(0) == 0 {
                errors.add("effort", "Effort is required");
            }
            if draft.deadline_type.is_none() {
                errors.add("deadline", "Deadline type is required");
            }
        }
        ItemType::Event => {
            if draft.start_iso.as_deref().is_none_or(|s| s.trim().is_empty()) {
                errors.add("start", "Start date/time is required");
            }
            if !draft.all_day.unwrap_or(false) && draft.duration_min.unwrap_or(0) == 0 {
                errors.add("duration", "Duration is required for non-all-day events");
            }
        }
    }

    errors
}
