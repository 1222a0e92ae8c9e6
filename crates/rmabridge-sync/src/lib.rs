//! # rmabridge Reconciliation Engine
//!
//! Bidirectional reconciliation of ticket records between two external
//! systems, keyed by a shared RMA-style correlation identifier.
//!
//! One cycle runs two passes, System A → System B then System B → System A,
//! each over freshly fetched record sets. Matched records have their fields
//! propagated according to per-field source-of-truth rules; unmatched
//! records are parked in the approval queue, and only an explicit
//! [`BridgeEngine::approve`] ever creates a record on the opposite system.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐  fetch   ┌──────────────┐  resolve  ┌──────────────┐
//! │ System A  │─────────►│   Matcher    │──────────►│   Resolver   │
//! │ System B  │          │ (correlation │           │ (source-of-  │
//! └───────────┘          │    index)    │           │ truth rules) │
//!       ▲                └──────┬───────┘           └──────┬───────┘
//!       │                       │ no match                 │ update
//!       │ create (approved)     ▼                          ▼
//! ┌─────┴────────┐       ┌──────────────┐           ┌──────────────┐
//! │ ApprovalQueue│◄──────│ BridgeEngine │──────────►│ update calls │
//! └──────────────┘       └──────────────┘           └──────────────┘
//! ```
//!
//! All state (approval queue, activity log, outcome history) is
//! process-local and in-memory; a restart loses it. That is an accepted
//! limitation of this core, not a defect.
//!
//! [`BridgeEngine::approve`]: engine::BridgeEngine::approve

pub mod approval;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod matcher;
pub mod outcome;
pub mod resolver;

pub use approval::{ApprovalQueue, PendingApproval};
pub use config::{BridgeConfig, CorrelationConfig};
pub use engine::BridgeEngine;
pub use error::{SyncError, SyncResult};
pub use history::{ActivityEntry, LogLevel, OutcomeEntry, RecordAction};
pub use matcher::{CorrelationIndex, KeyPolicy};
pub use outcome::{PassCounters, SyncOutcome};
pub use resolver::{resolve_update, ResolvedUpdate};
