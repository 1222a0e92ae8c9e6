//! Engine error types.

use thiserror::Error;
use uuid::Uuid;

use rmabridge_connector::error::ConnectorError;
use rmabridge_connector::types::SystemEnd;

/// Errors that can occur during reconciliation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Approval entry unknown or already terminated.
    #[error("pending approval not found: {id}")]
    ApprovalNotFound { id: Uuid },

    /// Bulk fetch for one direction failed; that direction's pass is
    /// aborted.
    #[error("failed to fetch records from {}: {source}", .end.label())]
    Fetch {
        end: SystemEnd,
        #[source]
        source: ConnectorError,
    },

    /// A collaborator call failed and is surfaced to the caller
    /// (approve keeps the entry open so the approval can be retried).
    #[error("connector error: {0}")]
    Connector(#[from] ConnectorError),

    /// Engine configuration is invalid.
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl SyncError {
    /// Create an approval-not-found error.
    #[must_use]
    pub fn approval_not_found(id: Uuid) -> Self {
        Self::ApprovalNotFound { id }
    }

    /// Create a fetch error for the given end.
    #[must_use]
    pub fn fetch(end: SystemEnd, source: ConnectorError) -> Self {
        Self::Fetch { end, source }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if retrying the same call later could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Fetch { source, .. } => source.is_transient(),
            SyncError::Connector(source) => source.is_transient(),
            SyncError::ApprovalNotFound { .. } | SyncError::Configuration { .. } => false,
        }
    }
}

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let id = Uuid::new_v4();
        let err = SyncError::approval_not_found(id);
        assert!(err.to_string().contains(&id.to_string()));

        let err = SyncError::fetch(SystemEnd::B, ConnectorError::rate_limited("burst"));
        assert!(err.to_string().contains("System B"));
        assert!(err.to_string().contains("burst"));
    }

    #[test]
    fn test_is_retryable() {
        let transient = SyncError::fetch(
            SystemEnd::A,
            ConnectorError::connection_failed("refused"),
        );
        assert!(transient.is_retryable());

        let permanent = SyncError::Connector(ConnectorError::AuthenticationFailed);
        assert!(!permanent.is_retryable());

        assert!(!SyncError::approval_not_found(Uuid::new_v4()).is_retryable());
        assert!(!SyncError::configuration("bad schema").is_retryable());
    }
}
