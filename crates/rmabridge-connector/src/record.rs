//! Logical ticket records exchanged with the external systems.
//!
//! Records arrive already projected onto the configured fields plus the
//! correlation key; the engine never sees raw API payloads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque remote identifier of a record within its own system.
///
/// Needed to address updates; carries no meaning to the engine beyond
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordRef(String);

impl RecordRef {
    /// Create a new record reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A record from either system, projected onto the configured fields.
///
/// System A surfaces the correlation key as a direct property
/// (`correlation_key`); System B surfaces it as one of the projected
/// column values inside `fields`, addressed by the configured correlation
/// column id. The matcher's key policy decides which of the two is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Identifier of the record in its own system.
    pub remote_ref: RecordRef,
    /// Human-readable name (ticket subject or item name).
    pub display_name: String,
    /// Correlation key when the system exposes it as a direct property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_key: Option<String>,
    /// Projected field values, keyed by field or column id.
    pub fields: HashMap<String, String>,
}

impl TicketRecord {
    /// Create a record with no key and no fields.
    pub fn new(remote_ref: impl Into<RecordRef>, display_name: impl Into<String>) -> Self {
        Self {
            remote_ref: remote_ref.into(),
            display_name: display_name.into(),
            correlation_key: None,
            fields: HashMap::new(),
        }
    }

    /// Set the direct correlation key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.correlation_key = Some(key.into());
        self
    }

    /// Add a projected field value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Read a projected field value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Payload for creating a record on one of the systems.
///
/// Only the approval path ever builds one of these; unmatched records
/// never turn into creations without a human decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    /// Display name for the new record.
    pub display_name: String,
    /// Correlation key to stamp onto the new record, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_key: Option<String>,
    /// Field values for the new record, keyed by origin-side field name.
    pub fields: HashMap<String, String>,
}

impl NewTicket {
    /// Create a payload with no key and no fields.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            correlation_key: None,
            fields: HashMap::new(),
        }
    }

    /// Set the correlation key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.correlation_key = Some(key.into());
        self
    }

    /// Add a field value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = TicketRecord::new("42", "Broken widget")
            .with_key("RMA-100")
            .with_field("status", "Open");

        assert_eq!(record.remote_ref.as_str(), "42");
        assert_eq!(record.correlation_key.as_deref(), Some("RMA-100"));
        assert_eq!(record.field("status"), Some("Open"));
        assert_eq!(record.field("priority"), None);
    }

    #[test]
    fn test_new_ticket_builder() {
        let ticket = NewTicket::new("Broken widget")
            .with_key("RMA-100")
            .with_field("content", "It broke");

        assert_eq!(ticket.display_name, "Broken widget");
        assert_eq!(ticket.correlation_key.as_deref(), Some("RMA-100"));
        assert_eq!(ticket.fields.get("content").map(String::as_str), Some("It broke"));
    }

    #[test]
    fn test_record_ref_transparent_serde() {
        let r = RecordRef::new("abc");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: RecordRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
