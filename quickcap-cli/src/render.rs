//! Terminal rendering for quickcap-core types.
//!
//! Extension traits that add colored output to core types using owo_colors.

use chrono::{DateTime, Local, NaiveDate, Utc};
use owo_colors::OwoColorize;
use quickcap_core::sync::{SyncReport, SyncStatus};
use quickcap_core::{DeadlineType, Due, FieldErrors, Item, ItemKind, Span, Status};

const SEPARATOR: &str = " • ";

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Status {
    fn render(&self) -> String {
        let label = self.label();
        match self {
            Status::Open => label.to_string(),
            Status::InProgress => label.yellow().to_string(),
            Status::OnHold | Status::Blocked => label.red().to_string(),
            Status::Completed => label.green().to_string(),
            Status::Canceled => label.dimmed().to_string(),
        }
    }
}

/// Two lines: number, status and title, then the details.
impl Render for Item {
    fn render(&self) -> String {
        let today = Local::now().date_naive();
        let number = match self.sequential_id {
            Some(n) => format!("#{}", n),
            None => "#?".to_string(),
        };

        let mut details = vec![summary(self, today)];
        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|t| format!("#{}", t)).collect();
            details.push(tags.join(" "));
        }
        details.push(format!("updated {}", relative_time(self.updated_at, Utc::now())));

        format!(
            "{} {} {}\n     {}",
            number.bold(),
            self.status.render(),
            self.title,
            details.join("  ").dimmed()
        )
    }
}

impl Render for FieldErrors {
    fn render(&self) -> String {
        self.iter()
            .map(|(field, message)| format!("  {}: {}", field, message).red().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for SyncStatus {
    fn render(&self) -> String {
        let text = self.to_string();
        match self {
            SyncStatus::Idle => text,
            SyncStatus::Syncing => text.yellow().to_string(),
            SyncStatus::Success => text.green().to_string(),
            SyncStatus::Error(_) => text.red().to_string(),
        }
    }
}

impl Render for SyncReport {
    fn render(&self) -> String {
        format!(
            "{} {} {}, {} {}",
            capitalize(&self.direction.to_string()),
            self.items,
            pluralize("item", self.items),
            self.tags,
            pluralize("tag", self.tags),
        )
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// "Today", "Tomorrow", or a short date.
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today + chrono::Duration::days(1) {
        "Tomorrow".to_string()
    } else {
        date.format("%a %b %-d").to_string()
    }
}

/// One-line type-specific summary, e.g. "Due: Today • 120m • hard • P2".
pub fn summary(item: &Item, today: NaiveDate) -> String {
    let mut parts = Vec::new();

    match &item.kind {
        ItemKind::Task(task) => {
            parts.push(match task.due {
                Due::Date(date) => format!("Due: {}", date_label(date, today)),
                Due::Week(start) => format!("Due: Week of {}", start.format("%b %-d")),
            });
            parts.push(format!("{}m", task.effort_min));
            parts.push(match task.deadline {
                DeadlineType::Hard => "hard".to_string(),
                DeadlineType::Soft => "soft".to_string(),
            });
        }
        ItemKind::Event(event) => {
            let start = event.start.naive_local();
            match event.span {
                Span::AllDay => {
                    parts.push(format!("Starts: {}", date_label(start.date(), today)));
                    parts.push("all day".to_string());
                }
                Span::Minutes(minutes) => {
                    parts.push(format!(
                        "Starts: {} {}",
                        date_label(start.date(), today),
                        start.format("%H:%M")
                    ));
                    parts.push(format!("{}m", minutes));
                }
            }
            if let Some(location) = &event.location {
                parts.push(format!("@ {}", location));
            }
        }
    }

    if let Some(priority) = item.priority {
        parts.push(format!("P{}", priority.value()));
    }

    parts.join(SEPARATOR)
}

/// "just now", "5m ago", "3h ago", "2d ago", or the date for anything older
/// than a week.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        then.format("%b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use quickcap_core::{Draft, ItemType, Priority};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn stamp(draft: Draft) -> Item {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
        Item::stamp(draft, None, now, 1).unwrap()
    }

    #[test]
    fn task_summary_lists_due_effort_deadline_priority() {
        let item = stamp(Draft {
            item_type: Some(ItemType::Task),
            title: "report".into(),
            due_date: Some(today()),
            effort_min: Some(120),
            deadline_type: Some(DeadlineType::Hard),
            priority: Priority::try_from(2).ok(),
            ..Draft::blank("UTC")
        });
        assert_eq!(summary(&item, today()), "Due: Today • 120m • hard • P2");
    }

    #[test]
    fn week_tasks_show_the_week() {
        let mut draft = Draft {
            item_type: Some(ItemType::Task),
            title: "plan".into(),
            effort_min: Some(30),
            deadline_type: Some(DeadlineType::Soft),
            ..Draft::blank("UTC")
        };
        draft.set_due_week(today());
        assert_eq!(summary(&stamp(draft), today()), "Due: Week of Mar 16 • 30m • soft");
    }

    #[test]
    fn event_summary_shows_start_and_length() {
        let item = stamp(Draft {
            item_type: Some(ItemType::Event),
            title: "dentist".into(),
            start_iso: Some("2025-03-21T09:00:00".into()),
            duration_min: Some(45),
            location: Some("High St".into()),
            ..Draft::blank("UTC")
        });
        assert_eq!(summary(&item, today()), "Starts: Tomorrow 09:00 • 45m • @ High St");

        let all_day = stamp(Draft {
            item_type: Some(ItemType::Event),
            title: "offsite".into(),
            start_iso: Some("2025-03-24T09:00:00".into()),
            all_day: Some(true),
            ..Draft::blank("UTC")
        });
        assert_eq!(summary(&all_day, today()), "Starts: Mon Mar 24 • all day");
    }

    #[test]
    fn relative_times() {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::seconds(20), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2d ago");
        assert_eq!(relative_time(now - Duration::days(30), now), "Feb 18");
    }

    #[test]
    fn pluralizes() {
        assert_eq!(pluralize("item", 1), "item");
        assert_eq!(pluralize("item", 0), "items");
    }
}
