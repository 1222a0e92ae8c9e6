//! Bridge engine orchestrator.
//!
//! Drives one full reconciliation cycle in each direction, invoking the
//! matcher and resolver per record, and owns the approval queue and the
//! bounded activity history.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use rmabridge_connector::mapping::{validate_mappings, FieldMapping};
use rmabridge_connector::record::{NewTicket, RecordRef, TicketRecord};
use rmabridge_connector::traits::TicketStore;
use rmabridge_connector::types::{SyncDirection, SystemEnd};

use crate::approval::{ApprovalQueue, EnqueueOutcome, PendingApproval};
use crate::config::BridgeConfig;
use crate::error::{SyncError, SyncResult};
use crate::history::{
    ActivityEntry, ActivityLog, LogLevel, OutcomeEntry, OutcomeHistory, RecordAction,
};
use crate::matcher::{CorrelationIndex, KeyPolicy};
use crate::outcome::{PassCounters, SyncOutcome};
use crate::resolver::resolve_update;

/// Everything the engine mutates across cycles.
///
/// One lock over the whole of it: a cycle holds the lock from first fetch
/// to final summary, which serializes manual and scheduled triggers and
/// lets the approval-dedup check observe consistent state without finer
/// locking. Approve and reject take the same lock.
struct EngineState {
    config: BridgeConfig,
    approvals: ApprovalQueue,
    activity: ActivityLog,
    history: OutcomeHistory,
    last_sync: Option<DateTime<Utc>>,
}

/// Bidirectional reconciliation engine over two external ticket systems.
pub struct BridgeEngine {
    system_a: Arc<dyn TicketStore>,
    system_b: Arc<dyn TicketStore>,
    state: Mutex<EngineState>,
}

impl BridgeEngine {
    /// Create an engine with the default configuration (sync disabled).
    #[must_use]
    pub fn new(system_a: Arc<dyn TicketStore>, system_b: Arc<dyn TicketStore>) -> Self {
        Self::with_config(system_a, system_b, BridgeConfig::default())
    }

    /// Create an engine with a custom configuration.
    #[must_use]
    pub fn with_config(
        system_a: Arc<dyn TicketStore>,
        system_b: Arc<dyn TicketStore>,
        config: BridgeConfig,
    ) -> Self {
        let activity = ActivityLog::new(config.activity_capacity);
        let history = OutcomeHistory::new(config.history_capacity);
        Self {
            system_a,
            system_b,
            state: Mutex::new(EngineState {
                config,
                approvals: ApprovalQueue::new(),
                activity,
                history,
                last_sync: None,
            }),
        }
    }

    /// Run one full reconciliation cycle: System A → System B, then
    /// System B → System A, each over freshly fetched record sets.
    ///
    /// A fetch failure aborts only the direction that needed it; the
    /// other direction still runs. Per-record write failures are counted
    /// and logged but never abort the pass. A disabled engine does
    /// nothing and returns an empty outcome.
    pub async fn run_cycle(&self) -> SyncResult<SyncOutcome> {
        let mut state = self.state.lock().await;
        let started_at = Utc::now();
        let mut outcome = SyncOutcome::empty(started_at);
        let mut any_pass_completed = false;

        for direction in [SyncDirection::AToB, SyncDirection::BToA] {
            if !state.config.enabled {
                tracing::debug!(direction = %direction, "sync disabled, skipping pass");
                continue;
            }

            tracing::info!(direction = %direction, "starting reconciliation pass");
            state.activity.log(
                LogLevel::Info,
                format!("Starting {} sync...", direction.label()),
            );

            match self
                .run_pass(&mut state, direction, started_at, &mut outcome)
                .await
            {
                Ok(counters) => {
                    let level = if counters.has_failures() {
                        LogLevel::Error
                    } else {
                        LogLevel::Success
                    };
                    state.activity.log(
                        level,
                        format!("{} sync complete: {}", direction.label(), counters.summary()),
                    );
                    tracing::info!(
                        direction = %direction,
                        updated = counters.updated,
                        pending = counters.pending,
                        skipped = counters.skipped,
                        failed = counters.failed,
                        "reconciliation pass complete"
                    );
                    outcome.counters.merge(&counters);
                    any_pass_completed = true;
                }
                Err(err) => {
                    // Pass-level failure: this direction is abandoned,
                    // the opposite direction still gets its attempt.
                    state
                        .activity
                        .log(LogLevel::Error, format!("Sync failed: {err}"));
                    tracing::warn!(direction = %direction, error = %err, "reconciliation pass failed");
                }
            }
        }

        if any_pass_completed {
            state.last_sync = Some(Utc::now());
        }
        Ok(outcome)
    }

    /// One direction's pass over freshly fetched record sets.
    async fn run_pass(
        &self,
        state: &mut EngineState,
        direction: SyncDirection,
        cycle_started_at: DateTime<Utc>,
        outcome: &mut SyncOutcome,
    ) -> SyncResult<PassCounters> {
        let origin = self.store_for(direction.origin());
        let target = self.store_for(direction.target());
        let origin_policy = self.key_policy(&state.config, direction.origin());
        let target_policy = self.key_policy(&state.config, direction.target());
        let mappings = state.config.mappings.clone();

        let origin_records = origin
            .fetch_records()
            .await
            .map_err(|e| SyncError::fetch(direction.origin(), e))?;
        let target_records = target
            .fetch_records()
            .await
            .map_err(|e| SyncError::fetch(direction.target(), e))?;

        let index = CorrelationIndex::build(&target_records, &target_policy);
        let mut counters = PassCounters::default();

        for record in &origin_records {
            let Some(key) = origin_policy.extract(record) else {
                Self::push_outcome(
                    state,
                    outcome,
                    &mut counters,
                    cycle_started_at,
                    direction,
                    RecordAction::Skipped,
                    &record.display_name,
                    "No correlation key".to_string(),
                    LogLevel::Info,
                );
                continue;
            };

            match index.find(key) {
                None => {
                    let queued = state.approvals.enqueue(
                        direction,
                        record.display_name.clone(),
                        key,
                        Self::approval_payload(record, &mappings, direction.origin()),
                        format!("No matching record in {}", direction.target().label()),
                    );
                    match queued {
                        EnqueueOutcome::Queued => {
                            Self::push_outcome(
                                state,
                                outcome,
                                &mut counters,
                                cycle_started_at,
                                direction,
                                RecordAction::PendingApproval,
                                &record.display_name,
                                format!("RMA: {key}, added to approval queue"),
                                LogLevel::Info,
                            );
                        }
                        EnqueueOutcome::AlreadyPending => {
                            Self::push_outcome(
                                state,
                                outcome,
                                &mut counters,
                                cycle_started_at,
                                direction,
                                RecordAction::AlreadyPending,
                                &record.display_name,
                                format!("RMA: {key}, already in approval queue"),
                                LogLevel::Info,
                            );
                        }
                    }
                }
                Some(counterpart) => {
                    let update = resolve_update(record, counterpart, &mappings, direction);
                    if update.is_empty() {
                        Self::push_outcome(
                            state,
                            outcome,
                            &mut counters,
                            cycle_started_at,
                            direction,
                            RecordAction::Skipped,
                            &record.display_name,
                            format!("RMA: {key}, no fields to sync (source of truth rules)"),
                            LogLevel::Info,
                        );
                        continue;
                    }

                    match target
                        .update_record(&counterpart.remote_ref, &update.values)
                        .await
                    {
                        Ok(()) => {
                            Self::push_outcome(
                                state,
                                outcome,
                                &mut counters,
                                cycle_started_at,
                                direction,
                                RecordAction::Updated,
                                &record.display_name,
                                format!("RMA: {key}, fields: {}", update.label_summary()),
                                LogLevel::Success,
                            );
                        }
                        Err(err) => {
                            // Per-record failure: count it and keep going.
                            tracing::warn!(
                                direction = %direction,
                                correlation_key = %key,
                                error = %err,
                                "record update failed"
                            );
                            state.activity.log(
                                LogLevel::Error,
                                format!("Failed to sync record: {}", record.display_name),
                            );
                            Self::push_outcome(
                                state,
                                outcome,
                                &mut counters,
                                cycle_started_at,
                                direction,
                                RecordAction::Failed,
                                &record.display_name,
                                format!("RMA: {key}, error: {err}"),
                                LogLevel::Error,
                            );
                        }
                    }
                }
            }
        }

        Ok(counters)
    }

    /// Enable or disable the engine. Takes effect at the next pass
    /// boundary; a running cycle holds the state lock, so the flag never
    /// changes mid-cycle.
    pub async fn set_enabled(&self, enabled: bool) {
        let mut state = self.state.lock().await;
        state.config.enabled = enabled;
        let message = if enabled {
            "Auto-sync enabled"
        } else {
            "Auto-sync disabled"
        };
        state.activity.log(LogLevel::Info, message);
        tracing::info!(enabled, "sync toggled");
    }

    /// Whether cycles currently do any work.
    pub async fn is_enabled(&self) -> bool {
        self.state.lock().await.config.enabled
    }

    /// Open approval entries, most recent first.
    pub async fn list_pending(&self) -> Vec<PendingApproval> {
        let state = self.state.lock().await;
        state.approvals.list().into_iter().cloned().collect()
    }

    /// Approve a pending entry: create the record on the direction's
    /// target system, then remove the entry.
    ///
    /// Fail-open: if the create call fails the entry stays in the queue
    /// and the error is surfaced, so the approval can be retried.
    pub async fn approve(&self, id: Uuid) -> SyncResult<RecordRef> {
        let mut state = self.state.lock().await;
        let entry = state.approvals.take(id)?;
        let target = self.store_for(entry.direction.target());

        let ticket = NewTicket {
            display_name: entry.display_name.clone(),
            correlation_key: Some(entry.correlation_key.clone()),
            fields: entry.payload.clone(),
        };

        match target.create_record(&ticket).await {
            Ok(remote) => {
                tracing::info!(
                    direction = %entry.direction,
                    correlation_key = %entry.correlation_key,
                    remote = %remote,
                    "approved record created"
                );
                state.activity.log(
                    LogLevel::Success,
                    format!("Approved & created record: {}", entry.display_name),
                );
                let now = Utc::now();
                state.history.push(OutcomeEntry {
                    cycle_started_at: now,
                    direction: entry.direction,
                    action: RecordAction::CreatedApproved,
                    display_name: entry.display_name,
                    detail: format!("RMA: {}, user approved", entry.correlation_key),
                    status: LogLevel::Success,
                    timestamp: now,
                });
                Ok(remote)
            }
            Err(err) => {
                tracing::warn!(
                    approval_id = %id,
                    error = %err,
                    "approved creation failed, entry kept open"
                );
                state.activity.log(
                    LogLevel::Error,
                    format!("Error creating approved record: {err}"),
                );
                state.approvals.restore(entry);
                Err(SyncError::Connector(err))
            }
        }
    }

    /// Reject a pending entry: remove it with no external call.
    pub async fn reject(&self, id: Uuid) -> SyncResult<()> {
        let mut state = self.state.lock().await;
        let entry = state.approvals.take(id)?;

        tracing::info!(
            direction = %entry.direction,
            correlation_key = %entry.correlation_key,
            "approval rejected"
        );
        state.activity.log(
            LogLevel::Info,
            format!("Rejected approval: {}", entry.display_name),
        );
        let now = Utc::now();
        state.history.push(OutcomeEntry {
            cycle_started_at: now,
            direction: entry.direction,
            action: RecordAction::Rejected,
            display_name: entry.display_name,
            detail: format!("RMA: {}, user rejected", entry.correlation_key),
            status: LogLevel::Info,
            timestamp: now,
        });
        Ok(())
    }

    /// Current mapping schema.
    pub async fn mappings(&self) -> Vec<FieldMapping> {
        self.state.lock().await.config.mappings.clone()
    }

    /// Replace the mapping schema wholesale. Takes effect on the next
    /// cycle, never mid-cycle.
    pub async fn set_mappings(&self, mappings: Vec<FieldMapping>) -> SyncResult<()> {
        validate_mappings(&mappings).map_err(|e| SyncError::configuration(e.to_string()))?;
        let mut state = self.state.lock().await;
        let count = mappings.len();
        state.config.mappings = mappings;
        state.activity.log(
            LogLevel::Success,
            format!("Field mappings updated: {count} mappings saved"),
        );
        Ok(())
    }

    /// Per-record outcome history, most recent first.
    pub async fn history(&self) -> Vec<OutcomeEntry> {
        self.state.lock().await.history.to_vec()
    }

    /// Summary activity log, most recent first.
    pub async fn activity(&self) -> Vec<ActivityEntry> {
        self.state.lock().await.activity.to_vec()
    }

    /// Timestamp of the last cycle in which at least one pass completed.
    pub async fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_sync
    }

    fn store_for(&self, end: SystemEnd) -> &Arc<dyn TicketStore> {
        match end {
            SystemEnd::A => &self.system_a,
            SystemEnd::B => &self.system_b,
        }
    }

    /// How a given side carries its correlation key: System A as a
    /// direct property, System B as a projected column.
    fn key_policy(&self, config: &BridgeConfig, end: SystemEnd) -> KeyPolicy {
        match end {
            SystemEnd::A => KeyPolicy::Direct,
            SystemEnd::B => KeyPolicy::column(config.correlation.column_b.clone()),
        }
    }

    /// Snapshot of the mapped origin-side fields present on a record,
    /// used as an approval payload.
    fn approval_payload(
        record: &TicketRecord,
        mappings: &[FieldMapping],
        origin: SystemEnd,
    ) -> HashMap<String, String> {
        mappings
            .iter()
            .filter_map(|mapping| {
                let field = mapping.field_for(origin);
                record
                    .field(field)
                    .map(|value| (field.to_string(), value.to_string()))
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn push_outcome(
        state: &mut EngineState,
        outcome: &mut SyncOutcome,
        counters: &mut PassCounters,
        cycle_started_at: DateTime<Utc>,
        direction: SyncDirection,
        action: RecordAction,
        display_name: &str,
        detail: String,
        status: LogLevel,
    ) {
        counters.record(action);
        let entry = OutcomeEntry {
            cycle_started_at,
            direction,
            action,
            display_name: display_name.to_string(),
            detail,
            status,
            timestamp: Utc::now(),
        };
        state.history.push(entry.clone());
        outcome.entries.push(entry);
    }
}
