//! Parsing of date, start time and minute arguments.

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveTime};
use quickcap_core::EventStart;

/// Events given only a day start at this time.
const DEFAULT_START: (u32, u32) = (9, 0);

/// Expand common abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| (*full).to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether the phrase names a time of day ("3pm", "15:30", "at 9", "noon").
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();

    if lower.contains("noon") || lower.contains("midnight") {
        return true;
    }

    let bytes = lower.as_bytes();
    for (i, pair) in bytes.windows(2).enumerate() {
        // "6pm", "6 pm"
        if (pair[0] == b'a' || pair[0] == b'p') && pair[1] == b'm' {
            if i > 0 && bytes[i - 1].is_ascii_digit() {
                return true;
            }
            if i > 1 && bytes[i - 1] == b' ' && bytes[i - 2].is_ascii_digit() {
                return true;
            }
        }
        // "15:30"
        if pair[0] == b':' && pair[1].is_ascii_digit() && i > 0 && bytes[i - 1].is_ascii_digit() {
            return true;
        }
    }

    lower
        .strip_prefix("at ")
        .or_else(|| lower.find(" at ").map(|pos| &lower[pos + 4..]))
        .is_some_and(|after| after.starts_with(|c: char| c.is_ascii_digit()))
}

/// A calendar date: `YYYY-MM-DD` or a phrase like "friday" or "next week".
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    let expanded = expand_abbreviations(input);
    fuzzydate::parse(&expanded)
        .map(|dt| dt.date())
        .map_err(|_| anyhow!("Could not parse date: \"{}\"", input))
}

/// An event start, returned in the form stored on the draft.
///
/// ISO local or RFC 3339 values are kept as given. Phrases are resolved
/// with fuzzydate to a floating local time; a phrase naming only a day
/// starts at 09:00.
pub fn parse_start(input: &str) -> Result<String> {
    let input = input.trim();
    if EventStart::parse(input).is_some() {
        return Ok(input.to_string());
    }

    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow!("Could not parse start time: \"{}\"", input))?;

    let dt = if has_time_component(input) {
        dt
    } else {
        let (h, m) = DEFAULT_START;
        dt.date().and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default())
    };

    Ok(dt.format("%Y-%m-%dT%H:%M").to_string())
}

/// Whole minutes from a plain integer ("90") or a humantime duration
/// ("1h30m", "45min").
pub fn parse_minutes(input: &str) -> Result<u32> {
    let input = input.trim();
    if let Ok(minutes) = input.parse::<u32>() {
        return Ok(minutes);
    }

    let duration = humantime::parse_duration(input)
        .map_err(|e| anyhow!("Could not parse duration \"{}\": {}", input, e))?;
    if duration.as_secs() % 60 != 0 {
        return Err(anyhow!("Duration must be whole minutes: \"{}\"", input));
    }
    u32::try_from(duration.as_secs() / 60).map_err(|_| anyhow!("Duration too long: \"{}\"", input))
}
