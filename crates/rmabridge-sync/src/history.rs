//! Bounded activity history.
//!
//! Two fixed-capacity ring buffers: a one-line-per-event summary log and
//! a per-record outcome history for audit. Both evict their oldest entry
//! on overflow and keep most-recent-first ordering for display.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rmabridge_connector::types::SyncDirection;

/// Severity of a log or outcome entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Routine activity.
    Info,
    /// A write that went through.
    Success,
    /// A failed call or aborted pass.
    Error,
}

impl LogLevel {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What happened to a single record during a pass, or to an approval
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordAction {
    /// A record was created on the target system.
    Created,
    /// Matched record updated.
    Updated,
    /// Nothing to do (no key, or no authoritative fields).
    Skipped,
    /// Queued for human approval.
    PendingApproval,
    /// Already in the approval queue from an earlier pass.
    AlreadyPending,
    /// A write call failed.
    Failed,
    /// An approval entry was rejected.
    Rejected,
    /// A record was created after explicit approval.
    CreatedApproved,
}

impl RecordAction {
    /// Display string used in audit lines.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordAction::Created => "Created",
            RecordAction::Updated => "Updated",
            RecordAction::Skipped => "Skipped",
            RecordAction::PendingApproval => "Pending Approval",
            RecordAction::AlreadyPending => "Already Pending",
            RecordAction::Failed => "Failed",
            RecordAction::Rejected => "Rejected",
            RecordAction::CreatedApproved => "Created (Approved)",
        }
    }
}

impl std::fmt::Display for RecordAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line in the summary activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
}

/// One per-record line in the outcome history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeEntry {
    /// Start time of the cycle this entry belongs to.
    pub cycle_started_at: DateTime<Utc>,
    /// Pass direction.
    pub direction: SyncDirection,
    /// What happened to the record.
    pub action: RecordAction,
    /// Display name of the record.
    pub display_name: String,
    /// Free-form detail (correlation key, field labels, error text).
    pub detail: String,
    /// Severity of the outcome.
    pub status: LogLevel,
    /// When the entry was written.
    pub timestamp: DateTime<Utc>,
}

/// Fixed-capacity, most-recent-first ring buffer.
#[derive(Debug)]
pub struct RingLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> RingLog<T> {
    /// Create a buffer holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new entry, evicting the oldest if full.
    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Snapshot of the entries, most recent first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.entries.iter().cloned().collect()
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Summary activity log.
pub type ActivityLog = RingLog<ActivityEntry>;

/// Per-record outcome history.
pub type OutcomeHistory = RingLog<OutcomeEntry>;

impl ActivityLog {
    /// Append a summary line.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.push(ActivityEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_evicts_oldest() {
        let mut log: RingLog<u32> = RingLog::new(3);
        for n in 1..=5 {
            log.push(n);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.to_vec(), vec![5, 4, 3]);
    }

    #[test]
    fn test_most_recent_first() {
        let mut log = ActivityLog::new(10);
        log.log(LogLevel::Info, "first");
        log.log(LogLevel::Error, "second");

        let entries = log.to_vec();
        assert_eq!(entries[0].message, "second");
        assert_eq!(entries[1].message, "first");
    }

    #[test]
    fn test_zero_capacity_drops_everything() {
        let mut log: RingLog<u32> = RingLog::new(0);
        log.push(1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_action_display_strings() {
        assert_eq!(RecordAction::CreatedApproved.to_string(), "Created (Approved)");
        assert_eq!(RecordAction::PendingApproval.to_string(), "Pending Approval");
        assert_eq!(RecordAction::AlreadyPending.to_string(), "Already Pending");
    }
}
