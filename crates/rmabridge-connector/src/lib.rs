//! # rmabridge Connector Seam
//!
//! Core abstractions for connecting the rmabridge reconciliation engine to
//! the two external ticket systems it keeps in step.
//!
//! The engine never speaks HTTP itself. Everything it needs from the
//! outside world is expressed here as a capability trait over logical
//! records, so the reconciliation logic stays testable against in-memory
//! fakes and the transport layer stays swappable.
//!
//! ## Crate Organization
//!
//! - [`types`] - System ends and sync directions
//! - [`record`] - Logical ticket records ([`TicketRecord`], [`NewTicket`])
//! - [`mapping`] - Field mapping schema with source-of-truth rules
//! - [`traits`] - Capability traits ([`FetchOp`], [`CreateOp`], [`UpdateOp`])
//! - [`error`] - Error types with transient/permanent classification
//!
//! [`TicketRecord`]: record::TicketRecord
//! [`NewTicket`]: record::NewTicket
//! [`FetchOp`]: traits::FetchOp
//! [`CreateOp`]: traits::CreateOp
//! [`UpdateOp`]: traits::UpdateOp

pub mod error;
pub mod mapping;
pub mod record;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ConnectorError, ConnectorResult};
    pub use crate::mapping::{FieldMapping, SourceOfTruth};
    pub use crate::record::{NewTicket, RecordRef, TicketRecord};
    pub use crate::traits::{CreateOp, FetchOp, TicketStore, TicketSystem, UpdateOp};
    pub use crate::types::{SyncDirection, SystemEnd};
}
