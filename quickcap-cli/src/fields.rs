//! Field flags shared by `add` and `edit`.

use anyhow::Result;
use clap::Args;
use quickcap_core::{DeadlineType, Form, Priority, Status};

use crate::parse::{parse_date, parse_minutes, parse_start};

/// Explicit field values. They are applied after any quick-entry phrase,
/// so they win over it. List flags replace the existing list, except
/// `--tag` which adds.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    /// Due date (YYYY-MM-DD or a phrase like "friday")
    #[arg(long, conflicts_with = "week")]
    pub due: Option<String>,

    /// Due some time in the week containing this date
    #[arg(long)]
    pub week: Option<String>,

    /// Effort in minutes ("90" or "1h30m")
    #[arg(long)]
    pub effort: Option<String>,

    /// The due point cannot move
    #[arg(long, conflicts_with = "soft")]
    pub hard: bool,

    /// The due point is a target
    #[arg(long)]
    pub soft: bool,

    /// Event start ("2025-03-20T15:00" or "friday 3pm")
    #[arg(long)]
    pub start: Option<String>,

    /// Event duration in minutes ("60" or "1h")
    #[arg(long)]
    pub duration: Option<String>,

    #[arg(long)]
    pub all_day: bool,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long = "attendee")]
    pub attendees: Vec<String>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// 1 (highest) to 5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub priority: Option<u8>,

    /// Open, "In Progress", "On Hold", Blocked, Completed or Canceled
    #[arg(long)]
    pub status: Option<Status>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long = "url")]
    pub urls: Vec<String>,

    /// Don't start the task before this date
    #[arg(long)]
    pub earliest_start: Option<String>,

    #[arg(long = "subtask")]
    pub subtasks: Vec<String>,

    /// Id of an item this one depends on
    #[arg(long = "depends-on")]
    pub dependencies: Vec<String>,

    /// Free-form recurrence rule
    #[arg(long)]
    pub recurrence: Option<String>,

    /// IANA timezone for this item
    #[arg(long)]
    pub timezone: Option<String>,
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

impl FieldArgs {
    pub fn apply(&self, form: &mut Form) -> Result<()> {
        if let Some(due) = &self.due {
            form.set_due_date(parse_date(due)?);
        }
        if let Some(week) = &self.week {
            form.set_due_week(parse_date(week)?);
        }
        for tag in &self.tags {
            form.add_tag(tag);
        }

        let draft = &mut form.draft;
        if let Some(effort) = &self.effort {
            draft.effort_min = Some(parse_minutes(effort)?);
        }
        if self.hard {
            draft.deadline_type = Some(DeadlineType::Hard);
        }
        if self.soft {
            draft.deadline_type = Some(DeadlineType::Soft);
        }
        if let Some(start) = &self.start {
            draft.start_iso = Some(parse_start(start)?);
        }
        if let Some(duration) = &self.duration {
            draft.duration_min = Some(parse_minutes(duration)?);
            draft.all_day = Some(false);
        }
        if self.all_day {
            draft.all_day = Some(true);
        }
        if let Some(location) = &self.location {
            draft.location = Some(location.clone());
        }
        if let Some(attendees) = non_empty(&self.attendees) {
            draft.attendees = Some(attendees);
        }
        if let Some(priority) = self.priority {
            draft.priority = Some(Priority::try_from(priority).map_err(anyhow::Error::msg)?);
        }
        if let Some(status) = self.status {
            draft.status = Some(status);
        }
        if let Some(notes) = &self.notes {
            draft.notes = Some(notes.clone());
        }
        if let Some(urls) = non_empty(&self.urls) {
            draft.urls = Some(urls);
        }
        if let Some(date) = &self.earliest_start {
            draft.earliest_start = Some(parse_date(date)?);
        }
        if let Some(subtasks) = non_empty(&self.subtasks) {
            draft.subtasks = Some(subtasks);
        }
        if let Some(dependencies) = non_empty(&self.dependencies) {
            draft.dependencies = Some(dependencies);
        }
        if let Some(recurrence) = &self.recurrence {
            draft.recurrence = Some(recurrence.clone());
        }
        if let Some(timezone) = &self.timezone {
            draft.timezone = Some(timezone.clone());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quickcap_core::ItemType;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    #[test]
    fn flags_override_quick_entry() {
        let mut form = Form::new(ItemType::Task, "UTC");
        form.quick_entry("report today 30m soft #work", today());

        let fields = FieldArgs {
            effort: Some("1h30m".into()),
            hard: true,
            week: Some("2025-03-20".into()),
            tags: vec!["urgent".into()],
            priority: Some(2),
            ..FieldArgs::default()
        };
        fields.apply(&mut form).unwrap();

        let draft = &form.draft;
        assert_eq!(draft.title, "report");
        assert_eq!(draft.effort_min, Some(90));
        assert_eq!(draft.deadline_type, Some(DeadlineType::Hard));
        assert_eq!(draft.due_date, None);
        assert_eq!(draft.due_week_start, NaiveDate::from_ymd_opt(2025, 3, 16));
        assert_eq!(draft.tags.sorted(), vec!["urgent", "work"]);
        assert_eq!(draft.priority.map(Priority::value), Some(2));
        assert!(form.validate());
    }

    #[test]
    fn event_flags_fill_event_fields() {
        let mut form = Form::new(ItemType::Event, "UTC");
        form.draft.title = "standup".into();

        let fields = FieldArgs {
            start: Some("2025-03-21T10:00".into()),
            duration: Some("15".into()),
            location: Some("Room 4".into()),
            attendees: vec!["ana@example.com".into()],
            ..FieldArgs::default()
        };
        fields.apply(&mut form).unwrap();

        assert_eq!(form.draft.start_iso.as_deref(), Some("2025-03-21T10:00"));
        assert_eq!(form.draft.duration_min, Some(15));
        assert_eq!(form.draft.attendees, Some(vec!["ana@example.com".to_string()]));
        assert!(form.validate());
    }

    #[test]
    fn unparseable_values_are_errors() {
        let mut form = Form::new(ItemType::Task, "UTC");
        let fields = FieldArgs {
            effort: Some("a while".into()),
            ..FieldArgs::default()
        };
        assert!(fields.apply(&mut form).is_err());
    }
}
