//! Source-of-truth field resolution.
//!
//! Given a matched pair, decides which mapped fields must flow in the
//! current pass direction. The invariant enforced here: a field is never
//! overwritten in a direction where its source of truth is the opposite
//! system, and a field already in sync is never rewritten.

use std::collections::HashMap;

use rmabridge_connector::mapping::FieldMapping;
use rmabridge_connector::record::TicketRecord;
use rmabridge_connector::types::SyncDirection;

/// The minimal update payload for one matched record.
#[derive(Debug, Clone, Default)]
pub struct ResolvedUpdate {
    /// Values to write, keyed by the mapping's origin-side field name.
    pub values: HashMap<String, String>,
    /// Human labels of the contributing mappings, for the audit detail
    /// line.
    pub labels: Vec<String>,
}

impl ResolvedUpdate {
    /// An empty payload means no authoritative fields differ in this
    /// direction; the record must be skipped, not updated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Comma-joined labels for log lines.
    #[must_use]
    pub fn label_summary(&self) -> String {
        self.labels.join(", ")
    }
}

/// Compute the update payload for one matched pair in one pass direction.
///
/// A mapping contributes iff all of:
/// - its source of truth permits the direction,
/// - the origin record actually carries a value for the origin-side
///   field (an absent value is "nothing to propagate", never "clear the
///   target"),
/// - the counterpart's value for the target-side field differs (a field
///   already in sync produces no write, which is what makes a second
///   cycle with no external changes a pure no-op).
///
/// A schema field the record does not carry is simply inert, never fatal.
#[must_use]
pub fn resolve_update(
    record: &TicketRecord,
    counterpart: &TicketRecord,
    mappings: &[FieldMapping],
    direction: SyncDirection,
) -> ResolvedUpdate {
    let origin = direction.origin();
    let target = direction.target();
    let mut resolved = ResolvedUpdate::default();

    for mapping in mappings {
        if !mapping.source_of_truth.allows(direction) {
            continue;
        }
        let Some(value) = record.field(mapping.field_for(origin)) else {
            continue;
        };
        if counterpart.field(mapping.field_for(target)) == Some(value) {
            continue;
        }
        // Duplicate origin fields collapse here, last write wins.
        resolved
            .values
            .insert(mapping.field_for(origin).to_string(), value.to_string());
        resolved.labels.push(mapping.label.clone());
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmabridge_connector::mapping::SourceOfTruth;

    fn schema() -> Vec<FieldMapping> {
        vec![
            FieldMapping::owned_by_a("content", "text", "Description"),
            FieldMapping::owned_by_b("status", "status_col", "Status"),
            FieldMapping::shared("priority", "priority_col", "Priority"),
        ]
    }

    #[test]
    fn test_direction_filtering() {
        let record = TicketRecord::new("1", "ticket")
            .with_field("content", "It broke")
            .with_field("status", "Open")
            .with_field("priority", "High");
        let counterpart = TicketRecord::new("2", "item");

        let update = resolve_update(&record, &counterpart, &schema(), SyncDirection::AToB);
        assert_eq!(update.values.get("content").map(String::as_str), Some("It broke"));
        assert_eq!(update.values.get("priority").map(String::as_str), Some("High"));
        // Status is System B's authority; it must never flow A → B.
        assert!(!update.values.contains_key("status"));
        assert_eq!(update.labels, vec!["Description", "Priority"]);
    }

    #[test]
    fn test_b_authority_scenario() {
        // Mapping [{status, sourceOfTruth: B}], A has Open, B has Closed.
        let mappings = vec![FieldMapping::new(
            "status",
            "status_col",
            "Status",
            SourceOfTruth::SystemB,
        )];
        let record_a = TicketRecord::new("a1", "ticket").with_field("status", "Open");
        let record_b = TicketRecord::new("b1", "item").with_field("status_col", "Closed");

        let a_to_b = resolve_update(&record_a, &record_b, &mappings, SyncDirection::AToB);
        assert!(a_to_b.is_empty());

        let b_to_a = resolve_update(&record_b, &record_a, &mappings, SyncDirection::BToA);
        assert_eq!(b_to_a.values.get("status_col").map(String::as_str), Some("Closed"));
    }

    #[test]
    fn test_synchronized_fields_produce_no_write() {
        let record = TicketRecord::new("1", "ticket")
            .with_field("content", "It broke")
            .with_field("priority", "High");
        let counterpart = TicketRecord::new("2", "item")
            .with_field("text", "It broke")
            .with_field("priority_col", "High");

        let update = resolve_update(&record, &counterpart, &schema(), SyncDirection::AToB);
        assert!(update.is_empty());
    }

    #[test]
    fn test_partially_synchronized_pair() {
        let record = TicketRecord::new("1", "ticket")
            .with_field("content", "It broke")
            .with_field("priority", "High");
        let counterpart = TicketRecord::new("2", "item")
            .with_field("text", "It broke")
            .with_field("priority_col", "Low");

        let update = resolve_update(&record, &counterpart, &schema(), SyncDirection::AToB);
        assert_eq!(update.values.len(), 1);
        assert_eq!(update.values.get("priority").map(String::as_str), Some("High"));
        assert_eq!(update.labels, vec!["Priority"]);
    }

    #[test]
    fn test_absent_value_propagates_nothing() {
        let record = TicketRecord::new("1", "ticket");
        let counterpart = TicketRecord::new("2", "item").with_field("text", "old text");
        let update = resolve_update(&record, &counterpart, &schema(), SyncDirection::AToB);
        // Absent origin value never means "clear the target".
        assert!(update.is_empty());
        assert!(update.labels.is_empty());
    }

    #[test]
    fn test_b_side_fields_keyed_by_column() {
        let record = TicketRecord::new("b1", "item")
            .with_field("status_col", "Closed")
            .with_field("priority_col", "Low");
        let counterpart = TicketRecord::new("a1", "ticket").with_field("status", "Open");

        let update = resolve_update(&record, &counterpart, &schema(), SyncDirection::BToA);
        assert_eq!(update.values.len(), 2);
        assert_eq!(update.values.get("status_col").map(String::as_str), Some("Closed"));
        assert!(!update.values.contains_key("content"));
    }

    #[test]
    fn test_label_summary() {
        let record = TicketRecord::new("1", "ticket")
            .with_field("content", "x")
            .with_field("priority", "High");
        let counterpart = TicketRecord::new("2", "item");
        let update = resolve_update(&record, &counterpart, &schema(), SyncDirection::AToB);
        assert_eq!(update.label_summary(), "Description, Priority");
    }
}
