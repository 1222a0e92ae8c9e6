//! Pending-approval queue.
//!
//! Records that matched nothing wait here for a human decision. The only
//! path to creating a cross-system record is an explicit approval; the
//! queue itself never talks to a collaborator.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rmabridge_connector::types::SyncDirection;

use crate::error::{SyncError, SyncResult};

/// An unmatched record awaiting a human decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingApproval {
    /// Opaque unique id.
    pub id: Uuid,
    /// Direction of the pass that detected the record.
    pub direction: SyncDirection,
    /// Display name of the unmatched record.
    pub display_name: String,
    /// Correlation key that found no counterpart.
    pub correlation_key: String,
    /// Snapshot of the record's field values at detection time, keyed by
    /// origin-side field name.
    pub payload: HashMap<String, String>,
    /// Why the record was queued.
    pub reason: String,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

/// Outcome of an enqueue attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// A new entry was created.
    Queued,
    /// An open entry already exists for this key and direction; nothing
    /// was added.
    AlreadyPending,
}

/// In-memory queue of open approval entries.
///
/// Invariant: at most one open entry per `(correlation_key, direction)`
/// pair. Not persisted; a process restart loses all pending approvals.
#[derive(Debug, Default)]
pub struct ApprovalQueue {
    entries: Vec<PendingApproval>,
}

impl ApprovalQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an unmatched record, unless one is already open for the
    /// same key and direction.
    pub fn enqueue(
        &mut self,
        direction: SyncDirection,
        display_name: impl Into<String>,
        correlation_key: impl Into<String>,
        payload: HashMap<String, String>,
        reason: impl Into<String>,
    ) -> EnqueueOutcome {
        let correlation_key = correlation_key.into();
        if self.contains(&correlation_key, direction) {
            return EnqueueOutcome::AlreadyPending;
        }
        self.entries.push(PendingApproval {
            id: Uuid::new_v4(),
            direction,
            display_name: display_name.into(),
            correlation_key,
            payload,
            reason: reason.into(),
            created_at: Utc::now(),
        });
        EnqueueOutcome::Queued
    }

    /// Whether an open entry exists for the key and direction.
    #[must_use]
    pub fn contains(&self, correlation_key: &str, direction: SyncDirection) -> bool {
        self.entries
            .iter()
            .any(|e| e.correlation_key == correlation_key && e.direction == direction)
    }

    /// Open entries, most recent first.
    #[must_use]
    pub fn list(&self) -> Vec<&PendingApproval> {
        self.entries.iter().rev().collect()
    }

    /// Remove and return an entry by id.
    ///
    /// The caller decides what to do with it: reject drops it, approve
    /// attempts the creation and calls [`ApprovalQueue::restore`] if the
    /// creation fails so the approval stays retryable.
    pub fn take(&mut self, id: Uuid) -> SyncResult<PendingApproval> {
        let position = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(SyncError::ApprovalNotFound { id })?;
        Ok(self.entries.remove(position))
    }

    /// Put a taken entry back after a failed approval.
    pub fn restore(&mut self, entry: PendingApproval) {
        self.entries.push(entry);
    }

    /// Number of open entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enqueue(queue: &mut ApprovalQueue, key: &str, direction: SyncDirection) -> EnqueueOutcome {
        queue.enqueue(direction, "ticket", key, HashMap::new(), "no match")
    }

    #[test]
    fn test_enqueue_deduplicates_per_key_and_direction() {
        let mut queue = ApprovalQueue::new();
        assert_eq!(
            enqueue(&mut queue, "RMA-1", SyncDirection::AToB),
            EnqueueOutcome::Queued
        );
        assert_eq!(
            enqueue(&mut queue, "RMA-1", SyncDirection::AToB),
            EnqueueOutcome::AlreadyPending
        );
        assert_eq!(queue.len(), 1);

        // Same key in the opposite direction is a distinct entry.
        assert_eq!(
            enqueue(&mut queue, "RMA-1", SyncDirection::BToA),
            EnqueueOutcome::Queued
        );
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_list_most_recent_first() {
        let mut queue = ApprovalQueue::new();
        enqueue(&mut queue, "RMA-1", SyncDirection::AToB);
        enqueue(&mut queue, "RMA-2", SyncDirection::AToB);

        let listed = queue.list();
        assert_eq!(listed[0].correlation_key, "RMA-2");
        assert_eq!(listed[1].correlation_key, "RMA-1");
    }

    #[test]
    fn test_take_is_terminal() {
        let mut queue = ApprovalQueue::new();
        enqueue(&mut queue, "RMA-1", SyncDirection::AToB);
        let id = queue.list()[0].id;

        let entry = queue.take(id).unwrap();
        assert_eq!(entry.correlation_key, "RMA-1");
        assert!(queue.is_empty());

        // A second take on the same id signals not-found.
        assert!(matches!(
            queue.take(id),
            Err(SyncError::ApprovalNotFound { .. })
        ));
    }

    #[test]
    fn test_restore_reopens_entry() {
        let mut queue = ApprovalQueue::new();
        enqueue(&mut queue, "RMA-1", SyncDirection::AToB);
        let id = queue.list()[0].id;

        let entry = queue.take(id).unwrap();
        queue.restore(entry);

        assert!(queue.contains("RMA-1", SyncDirection::AToB));
        assert!(queue.take(id).is_ok());
    }

    #[test]
    fn test_unknown_id_not_found() {
        let mut queue = ApprovalQueue::new();
        assert!(matches!(
            queue.take(Uuid::new_v4()),
            Err(SyncError::ApprovalNotFound { .. })
        ));
    }
}
