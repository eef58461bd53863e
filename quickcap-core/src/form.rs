//! In-progress capture state.
//!
//! A `Form` owns the draft being edited, the selected item type and the
//! last validation result. It is passed explicitly through quick entry,
//! validation and save; nothing about it is global.

use chrono::NaiveDate;

use crate::error::{CaptureError, CaptureResult};
use crate::item::{Draft, Item, ItemType};
use crate::quick_entry;
use crate::validate::{FieldErrors, validate};

#[derive(Debug, Clone)]
pub struct Form {
    pub item_type: ItemType,
    pub draft: Draft,
    editing: Option<Item>,
    errors: FieldErrors,
}

impl Form {
    /// A blank form for a new item.
    pub fn new(item_type: ItemType, timezone: impl Into<String>) -> Self {
        Form {
            item_type,
            draft: Draft::blank(timezone),
            editing: None,
            errors: FieldErrors::default(),
        }
    }

    /// A form pre-filled with an existing item.
    pub fn edit(item: Item) -> Self {
        Form {
            item_type: item.item_type(),
            draft: Draft::from(item.clone()),
            editing: Some(item),
            errors: FieldErrors::default(),
        }
    }

    pub fn editing(&self) -> Option<&Item> {
        self.editing.as_ref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn quick_entry(&mut self, text: &str, today: NaiveDate) {
        quick_entry::apply(text, self.item_type, &mut self.draft, today);
    }

    pub fn set_due_date(&mut self, date: NaiveDate) {
        self.draft.set_due_date(date);
    }

    pub fn set_due_week(&mut self, date: NaiveDate) {
        self.draft.set_due_week(date);
    }

    /// Add a tag unless it is blank or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.draft.tags.insert(tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.draft.tags.remove(tag)
    }

    /// Run the validator and remember its result.
    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.draft, self.item_type);
        self.errors.is_empty()
    }

    /// The draft to hand to a store, or the validation errors.
    ///
    /// The form itself is left untouched either way so a failed save can be
    /// retried with the same state.
    pub fn submission(&mut self) -> CaptureResult<Draft> {
        if !self.validate() {
            return Err(CaptureError::Validation(self.errors.clone()));
        }

        let mut draft = self.draft.clone();
        draft.item_type = Some(self.item_type);
        draft.title = draft.title.trim().to_string();
        draft.retain_fields_for(self.item_type);
        if draft.all_day == Some(true) {
            draft.duration_min = None;
        }
        if let Some(item) = &self.editing {
            draft.id = Some(item.id.clone());
        }
        Ok(draft)
    }
}
