//! Per-pass and per-cycle outcome reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::{OutcomeEntry, RecordAction};

/// Counters for one pass or one whole cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassCounters {
    /// Records created (approval path only during a pass).
    pub created: usize,
    /// Matched records updated.
    pub updated: usize,
    /// Records with nothing to do.
    pub skipped: usize,
    /// Records newly queued for approval.
    pub pending: usize,
    /// Records whose write call failed.
    pub failed: usize,
}

impl PassCounters {
    /// Bump the counter matching a record action.
    pub fn record(&mut self, action: RecordAction) {
        match action {
            RecordAction::Created | RecordAction::CreatedApproved => self.created += 1,
            RecordAction::Updated => self.updated += 1,
            RecordAction::Skipped | RecordAction::AlreadyPending => self.skipped += 1,
            RecordAction::PendingApproval => self.pending += 1,
            RecordAction::Failed => self.failed += 1,
            RecordAction::Rejected => {}
        }
    }

    /// Fold another pass into this one.
    pub fn merge(&mut self, other: &PassCounters) {
        self.created += other.created;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.pending += other.pending;
        self.failed += other.failed;
    }

    /// One-line totals for the summary log.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} created, {} updated, {} pending approval, {} skipped, {} failed",
            self.created, self.updated, self.pending, self.skipped, self.failed
        )
    }

    /// Whether any write call failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Structured outcome of one reconciliation cycle.
///
/// Rebuilt each cycle; the engine retains a bounded history of the
/// per-record entries purely for observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// When the cycle started.
    pub started_at: DateTime<Utc>,
    /// Aggregate counters across both directions.
    pub counters: PassCounters,
    /// Per-record audit entries, in processing order.
    pub entries: Vec<OutcomeEntry>,
}

impl SyncOutcome {
    /// An empty outcome for a cycle that did no work.
    #[must_use]
    pub fn empty(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            counters: PassCounters::default(),
            entries: Vec::new(),
        }
    }
}
