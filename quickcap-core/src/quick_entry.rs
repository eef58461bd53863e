//! Quick-entry parsing: one free-text phrase into a draft patch.
//!
//! The phrase is lowercased, then checked in a fixed order:
//!
//! 1. `#tag` tokens. When any are present they replace the draft's tags.
//! 2. The word `hard`, else the word `soft`, sets the deadline type.
//! 3. The first `<h>h[<m>][m]` or `<m>m` token sets effort (tasks) or
//!    duration (events) in minutes.
//! 4. `today`, else `tomorrow`, sets the due date (tasks) or a 09:00 start
//!    (events).
//! 5. `all-day` marks an event as all-day.
//! 6. Whatever is left after stripping those tokens becomes the title.
//!
//! Fields the phrase doesn't mention are left as they were.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;

use crate::item::{DeadlineType, Draft, ItemType};

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_]+)").unwrap());
static HARD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?-u:\b)hard(?-u:\b)").unwrap());
static SOFT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?-u:\b)soft(?-u:\b)").unwrap());
static HARDNESS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?-u:\b)(hard|soft)(?-u:\b)").unwrap());
static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)h([0-9]+)?m?|([0-9]+)m").unwrap());
static TODAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?-u:\b)today(?-u:\b)").unwrap());
static TOMORROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?-u:\b)tomorrow(?-u:\b)").unwrap());
static RELATIVE_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)(today|tomorrow)(?-u:\b)").unwrap());

const ALL_DAY: &str = "all-day";

/// Events placed on a relative day start at this local time.
pub const DEFAULT_EVENT_TIME: &str = "09:00:00";

/// Apply `input` to `draft` for an item of type `item_type`.
///
/// `today` is the user's local date, used for "today"/"tomorrow".
pub fn apply(input: &str, item_type: ItemType, draft: &mut Draft, today: NaiveDate) {
    let input = input.to_lowercase();

    let tags: Vec<&str> = TAG
        .captures_iter(&input)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    if !tags.is_empty() {
        draft.tags = tags.into_iter().collect();
    }

    if HARD.is_match(&input) {
        draft.deadline_type = Some(DeadlineType::Hard);
    } else if SOFT.is_match(&input) {
        draft.deadline_type = Some(DeadlineType::Soft);
    }

    if let Some(minutes) = first_duration(&input) {
        match item_type {
            ItemType::Task => draft.effort_min = Some(minutes),
            ItemType::Event => draft.duration_min = Some(minutes),
        }
    }

    let day = if TODAY.is_match(&input) {
        Some(today)
    } else if TOMORROW.is_match(&input) {
        Some(today + Duration::days(1))
    } else {
        None
    };
    if let Some(day) = day {
        match item_type {
            ItemType::Task => draft.set_due_date(day),
            ItemType::Event => {
                draft.start_iso = Some(format!("{}T{}", day.format("%Y-%m-%d"), DEFAULT_EVENT_TIME))
            }
        }
    }

    if item_type == ItemType::Event && input.contains(ALL_DAY) {
        draft.all_day = Some(true);
    }

    let title = title_residue(&input);
    if !title.is_empty() {
        draft.title = title;
    }
}

/// Minutes of the first duration-shaped token, if any. A token whose
/// numbers don't fit in `u32` minutes counts as no duration.
fn first_duration(input: &str) -> Option<u32> {
    let caps = DURATION.captures(input)?;
    let number = |m: regex::Match<'_>| m.as_str().parse::<u32>().ok();

    match caps.get(1) {
        Some(hours) => {
            let minutes = match caps.get(2) {
                Some(m) => number(m)?,
                None => 0,
            };
            number(hours)?.checked_mul(60)?.checked_add(minutes)
        }
        None => number(caps.get(3)?),
    }
}

/// Input with every recognized token removed, trimmed.
///
/// Every duration-shaped token is stripped, not only the one that was
/// captured, so "30m then 15m" leaves neither number in the title.
fn title_residue(input: &str) -> String {
    let s = TAG.replace_all(input, "");
    let s = HARDNESS.replace_all(&s, "");
    let s = DURATION.replace_all(&s, "");
    let s = RELATIVE_DAY.replace_all(&s, "");
    let s = s.replace(ALL_DAY, "");
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::TagSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn parse(input: &str, item_type: ItemType) -> Draft {
        let mut draft = Draft::blank("UTC");
        apply(input, item_type, &mut draft, today());
        draft
    }

    #[test]
    fn task_phrase_sets_tags_deadline_effort_and_title() {
        let draft = parse("Draft proposal by Friday 2h hard #work", ItemType::Task);

        assert_eq!(draft.tags, ["work"].into_iter().collect::<TagSet>());
        assert_eq!(draft.deadline_type, Some(DeadlineType::Hard));
        assert_eq!(draft.effort_min, Some(120));
        assert_eq!(draft.duration_min, None);
        assert_eq!(draft.title, "draft proposal by friday");
    }

    #[test]
    fn event_phrase_sets_duration_and_tomorrow_start() {
        let draft = parse("Standup tomorrow 30m #team", ItemType::Event);

        assert_eq!(draft.tags, ["team"].into_iter().collect::<TagSet>());
        assert_eq!(draft.duration_min, Some(30));
        assert_eq!(draft.effort_min, None);
        assert_eq!(draft.start_iso.as_deref(), Some("2025-03-21T09:00:00"));
        assert_eq!(draft.title, "standup");
    }

    #[test]
    fn hours_and_minutes_add_up() {
        assert_eq!(parse("review 1h30m", ItemType::Task).effort_min, Some(90));
        assert_eq!(parse("review 1h30", ItemType::Task).effort_min, Some(90));
        assert_eq!(parse("review 45m", ItemType::Task).effort_min, Some(45));
    }

    #[test]
    fn only_first_duration_is_captured_but_all_are_stripped() {
        let draft = parse("call 30m then 15m", ItemType::Task);
        assert_eq!(draft.effort_min, Some(30));
        assert_eq!(draft.title, "call  then");
    }

    #[test]
    fn hard_wins_over_soft() {
        let draft = parse("soft launch hard stop", ItemType::Task);
        assert_eq!(draft.deadline_type, Some(DeadlineType::Hard));

        let draft = parse("soft target", ItemType::Task);
        assert_eq!(draft.deadline_type, Some(DeadlineType::Soft));
    }

    #[test]
    fn today_wins_over_tomorrow() {
        let draft = parse("today or tomorrow", ItemType::Task);
        assert_eq!(draft.due_date, Some(today()));
    }

    #[test]
    fn relative_day_for_task_replaces_due_week() {
        let mut draft = Draft::blank("UTC");
        draft.set_due_week(today());
        apply("pay rent today", ItemType::Task, &mut draft, today());

        assert_eq!(draft.due_date, Some(today()));
        assert_eq!(draft.due_week_start, None);
        assert_eq!(draft.start_iso, None);
    }

    #[test]
    fn all_day_only_applies_to_events() {
        let event = parse("offsite all-day", ItemType::Event);
        assert_eq!(event.all_day, Some(true));
        assert_eq!(event.title, "offsite");

        let task = parse("offsite all-day", ItemType::Task);
        assert_eq!(task.all_day, None);
        assert_eq!(task.title, "offsite");
    }

    #[test]
    fn tags_replace_existing_tags() {
        let mut draft = Draft::blank("UTC");
        draft.tags = ["home", "errands"].into_iter().collect();
        apply("buy milk #shopping", ItemType::Task, &mut draft, today());

        assert_eq!(draft.tags, ["shopping"].into_iter().collect::<TagSet>());
    }

    #[test]
    fn unmatched_rules_leave_fields_untouched() {
        let mut draft = Draft::blank("UTC");
        draft.title = "Existing".into();
        draft.tags = ["keep"].into_iter().collect();
        draft.effort_min = Some(25);
        draft.deadline_type = Some(DeadlineType::Soft);

        apply("#only", ItemType::Task, &mut draft, today());

        assert_eq!(draft.title, "Existing");
        assert_eq!(draft.effort_min, Some(25));
        assert_eq!(draft.deadline_type, Some(DeadlineType::Soft));
        assert_eq!(draft.tags, ["only"].into_iter().collect::<TagSet>());
    }

    #[test]
    fn standalone_words_only_for_hardness() {
        let draft = parse("update hardware drivers", ItemType::Task);
        assert_eq!(draft.deadline_type, None);
        assert_eq!(draft.title, "update hardware drivers");
    }

    #[test]
    fn non_ascii_digits_are_not_durations() {
        let mut draft = Draft::blank("UTC");
        draft.effort_min = Some(25);
        apply("call \u{0663}m", ItemType::Task, &mut draft, today());

        assert_eq!(draft.effort_min, Some(25));
        assert_eq!(draft.title, "call \u{0663}m");
    }

    #[test]
    fn oversized_durations_keep_the_previous_value() {
        let mut draft = Draft::blank("UTC");
        draft.effort_min = Some(25);
        apply("call 99999999999h", ItemType::Task, &mut draft, today());
        assert_eq!(draft.effort_min, Some(25));

        apply("call 80000000h", ItemType::Task, &mut draft, today());
        assert_eq!(draft.effort_min, Some(25));
    }

    #[test]
    fn word_boundaries_are_ascii() {
        let draft = parse("hardé today", ItemType::Task);
        assert_eq!(draft.deadline_type, Some(DeadlineType::Hard));
        assert_eq!(draft.due_date, Some(today()));
        assert_eq!(draft.title, "é");
    }
}
