//! Ticket system capability traits.
//!
//! Capability-based trait definitions for the two external collaborators.
//! The reconciliation engine only ever invokes these three operations:
//! bulk fetch, create, and field update.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::ConnectorResult;
use crate::record::{NewTicket, RecordRef, TicketRecord};
use crate::types::SystemEnd;

/// Base trait for both external ticket systems.
#[async_trait]
pub trait TicketSystem: Send + Sync {
    /// Which end of the bridge this collaborator serves.
    fn end(&self) -> SystemEnd;

    /// Display name for this system instance.
    fn display_name(&self) -> &str;

    /// Test the connection to the target system.
    ///
    /// Returns `Ok(())` if the system is reachable with the configured
    /// credentials.
    async fn test_connection(&self) -> ConnectorResult<()>;
}

/// Capability for bulk-reading the current record set.
#[async_trait]
pub trait FetchOp: TicketSystem {
    /// Fetch all current records, already projected onto the configured
    /// fields plus the correlation key.
    ///
    /// A failure here is pass-level: the engine aborts the direction that
    /// needed the records rather than counting per-record failures.
    async fn fetch_records(&self) -> ConnectorResult<Vec<TicketRecord>>;
}

/// Capability for creating records in the target system.
#[async_trait]
pub trait CreateOp: TicketSystem {
    /// Create a new record.
    ///
    /// # Returns
    /// The remote reference of the created record.
    async fn create_record(&self, ticket: &NewTicket) -> ConnectorResult<RecordRef>;
}

/// Capability for updating fields of an existing record.
#[async_trait]
pub trait UpdateOp: TicketSystem {
    /// Overwrite the given fields on an existing record.
    ///
    /// `fields` is keyed by origin-side field name; the implementation
    /// owns the translation to its own column naming. Fields not present
    /// in the payload are left untouched.
    async fn update_record(
        &self,
        remote: &RecordRef,
        fields: &HashMap<String, String>,
    ) -> ConnectorResult<()>;
}

/// Marker trait for collaborators that support every operation the
/// engine needs.
pub trait TicketStore: FetchOp + CreateOp + UpdateOp {}

// Blanket implementation for any system that implements all three ops
impl<T> TicketStore for T where T: FetchOp + CreateOp + UpdateOp {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct MockSystem {
        name: String,
        healthy: AtomicBool,
    }

    impl MockSystem {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                healthy: AtomicBool::new(true),
            }
        }
    }

    #[async_trait]
    impl TicketSystem for MockSystem {
        fn end(&self) -> SystemEnd {
            SystemEnd::A
        }

        fn display_name(&self) -> &str {
            &self.name
        }

        async fn test_connection(&self) -> ConnectorResult<()> {
            if self.healthy.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(crate::error::ConnectorError::connection_failed(
                    "not healthy",
                ))
            }
        }
    }

    #[tokio::test]
    async fn test_mock_system() {
        let system = MockSystem::new("crm");
        assert_eq!(system.end(), SystemEnd::A);
        assert_eq!(system.display_name(), "crm");
        assert!(system.test_connection().await.is_ok());
    }

    #[tokio::test]
    async fn test_unhealthy_system() {
        let system = MockSystem::new("crm");
        system.healthy.store(false, Ordering::SeqCst);
        assert!(system.test_connection().await.is_err());
    }
}
