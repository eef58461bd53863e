//! Transient sync status for display.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
    Error(String),
}

impl SyncStatus {
    /// How long the status stays visible before reading as `Idle` again.
    /// `None` means until replaced.
    pub fn display_window(&self) -> Option<Duration> {
        match self {
            SyncStatus::Success => Some(Duration::from_secs(2)),
            SyncStatus::Error(_) => Some(Duration::from_secs(3)),
            SyncStatus::Idle | SyncStatus::Syncing => None,
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Idle => Ok(()),
            SyncStatus::Syncing => f.write_str("Syncing..."),
            SyncStatus::Success => f.write_str("Synced"),
            SyncStatus::Error(msg) => write!(f, "Sync failed: {}", msg),
        }
    }
}

/// A status plus the moment it was set.
#[derive(Debug, Clone)]
pub struct StatusBanner {
    status: SyncStatus,
    set_at: Instant,
}

impl StatusBanner {
    pub fn new(now: Instant) -> Self {
        StatusBanner {
            status: SyncStatus::Idle,
            set_at: now,
        }
    }

    pub fn set(&mut self, status: SyncStatus, now: Instant) {
        self.status = status;
        self.set_at = now;
    }

    /// The status as it should be shown at `now`.
    pub fn current(&self, now: Instant) -> SyncStatus {
        match self.status.display_window() {
            Some(window) if now.saturating_duration_since(self.set_at) >= window => SyncStatus::Idle,
            _ => self.status.clone(),
        }
    }
}
