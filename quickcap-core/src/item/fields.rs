//! Small enumerated field types shared by items and drafts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discriminator between the two item variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Task,
    Event,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Task => write!(f, "task"),
            ItemType::Event => write!(f, "event"),
        }
    }
}

/// Whether a task's due point is immovable or a soft target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineType {
    Hard,
    Soft,
}

impl fmt::Display for DeadlineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineType::Hard => write!(f, "hard"),
            DeadlineType::Soft => write!(f, "soft"),
        }
    }
}

/// Workflow status. New items start out `Open`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    Blocked,
    Completed,
    Canceled,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Open,
        Status::InProgress,
        Status::OnHold,
        Status::Blocked,
        Status::Completed,
        Status::Canceled,
    ];

    /// Completed and canceled items are closed; everything else is still open.
    pub fn is_closed(self) -> bool {
        matches!(self, Status::Completed | Status::Canceled)
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::OnHold => "On Hold",
            Status::Blocked => "Blocked",
            Status::Completed => "Completed",
            Status::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = String;

    /// Accepts the display label in any case, with spaces, dashes or underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        Status::ALL
            .into_iter()
            .find(|status| status.label().replace(' ', "").to_lowercase() == wanted)
            .ok_or_else(|| {
                let labels: Vec<_> = Status::ALL.iter().map(|s| s.label()).collect();
                format!("Unknown status '{}'. Expected one of: {}", s, labels.join(", "))
            })
    }
}

/// Priority from 1 (highest) to 5 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(1);
    pub const LOWEST: Priority = Priority(5);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::HIGHEST.0..=Self::LOWEST.0).contains(&value) {
            Ok(Priority(value))
        } else {
            Err(format!("Priority must be between 1 and 5, got {}", value))
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
