//! Correlation matching between the two record sets.
//!
//! Matching is exact string equality on a dedicated correlation key; no
//! fuzzy or case-insensitive matching, and display names are never used
//! as keys.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use rmabridge_connector::record::TicketRecord;

/// How to pull the correlation key out of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum KeyPolicy {
    /// The system exposes the key as a direct record property
    /// (System A style).
    Direct,
    /// The key is one of the projected column values, addressed by
    /// column id (System B style). Absent or empty text means "no key".
    Column { id: String },
}

impl KeyPolicy {
    /// Policy reading the given column id.
    pub fn column(id: impl Into<String>) -> Self {
        Self::Column { id: id.into() }
    }

    /// Extract the correlation key from a record.
    ///
    /// Empty strings are treated as "no key"; a record without a key can
    /// never be auto-matched.
    #[must_use]
    pub fn extract<'a>(&self, record: &'a TicketRecord) -> Option<&'a str> {
        let key = match self {
            KeyPolicy::Direct => record.correlation_key.as_deref(),
            KeyPolicy::Column { id } => record.field(id),
        };
        key.filter(|k| !k.is_empty())
    }
}

/// Index from correlation key to the single record observed on one side
/// during the current pass.
///
/// Built fresh per pass and never persisted; the correlation key itself
/// is the only cross-pass identity, and it lives in the external systems.
#[derive(Debug)]
pub struct CorrelationIndex<'a> {
    by_key: HashMap<&'a str, &'a TicketRecord>,
}

impl<'a> CorrelationIndex<'a> {
    /// Build an index over one side's records.
    ///
    /// Records without a key are excluded. Two records sharing a key is
    /// not an error; the later one wins.
    #[must_use]
    pub fn build(records: &'a [TicketRecord], policy: &KeyPolicy) -> Self {
        let mut by_key = HashMap::with_capacity(records.len());
        for record in records {
            if let Some(key) = policy.extract(record) {
                by_key.insert(key, record);
            }
        }
        Self { by_key }
    }

    /// Look up the counterpart for a correlation key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&'a TicketRecord> {
        self.by_key.get(key).copied()
    }

    /// Number of indexed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
