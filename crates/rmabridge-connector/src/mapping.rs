//! Field mapping schema with per-field source-of-truth rules.

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, ConnectorResult};
use crate::types::{SyncDirection, SystemEnd};

/// Which system's value wins when a mapped field is propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOfTruth {
    /// System A owns the field; it only flows A → B.
    SystemA,
    /// System B owns the field; it only flows B → A.
    SystemB,
    /// Either side may push the field.
    Both,
}

impl SourceOfTruth {
    /// Whether a value may be propagated in the given pass direction.
    ///
    /// A field can never be overwritten in a direction where its source
    /// of truth is the opposite system.
    #[must_use]
    pub fn allows(&self, direction: SyncDirection) -> bool {
        match self {
            SourceOfTruth::Both => true,
            SourceOfTruth::SystemA => direction.origin() == SystemEnd::A,
            SourceOfTruth::SystemB => direction.origin() == SystemEnd::B,
        }
    }

    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceOfTruth::SystemA => "system_a",
            SourceOfTruth::SystemB => "system_b",
            SourceOfTruth::Both => "both",
        }
    }
}

impl std::fmt::Display for SourceOfTruth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SourceOfTruth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system_a" | "a" => Ok(SourceOfTruth::SystemA),
            "system_b" | "b" => Ok(SourceOfTruth::SystemB),
            "both" => Ok(SourceOfTruth::Both),
            _ => Err(format!("Unknown source of truth: {s}")),
        }
    }
}

/// Correspondence between a System A field and a System B column.
///
/// The full ordered sequence of mappings is the schema for one
/// reconciliation pass; it never changes mid-pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field name on System A.
    pub source_field: String,
    /// Column id on System B.
    pub target_column: String,
    /// Human label used in audit detail lines.
    pub label: String,
    /// Which side owns the field.
    pub source_of_truth: SourceOfTruth,
}

impl FieldMapping {
    /// Create a mapping with an explicit source of truth.
    pub fn new(
        source_field: impl Into<String>,
        target_column: impl Into<String>,
        label: impl Into<String>,
        source_of_truth: SourceOfTruth,
    ) -> Self {
        Self {
            source_field: source_field.into(),
            target_column: target_column.into(),
            label: label.into(),
            source_of_truth,
        }
    }

    /// Create a mapping owned by System A.
    pub fn owned_by_a(
        source_field: impl Into<String>,
        target_column: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(source_field, target_column, label, SourceOfTruth::SystemA)
    }

    /// Create a mapping owned by System B.
    pub fn owned_by_b(
        source_field: impl Into<String>,
        target_column: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(source_field, target_column, label, SourceOfTruth::SystemB)
    }

    /// Create a mapping either side may push.
    pub fn shared(
        source_field: impl Into<String>,
        target_column: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(source_field, target_column, label, SourceOfTruth::Both)
    }

    /// The field or column name on the given side.
    #[must_use]
    pub fn field_for(&self, end: SystemEnd) -> &str {
        match end {
            SystemEnd::A => &self.source_field,
            SystemEnd::B => &self.target_column,
        }
    }
}

/// Validate a mapping schema before it is installed.
///
/// The resolver itself tolerates duplicate target columns (last write
/// wins), so this is the shell's chance to reject a broken schema at
/// save time instead.
pub fn validate_mappings(mappings: &[FieldMapping]) -> ConnectorResult<()> {
    let mut seen = std::collections::HashSet::new();
    for mapping in mappings {
        if mapping.source_field.is_empty() || mapping.target_column.is_empty() {
            return Err(ConnectorError::invalid_configuration(format!(
                "mapping '{}' has an empty field or column name",
                mapping.label
            )));
        }
        if !seen.insert(mapping.target_column.as_str()) {
            return Err(ConnectorError::invalid_configuration(format!(
                "duplicate target column '{}' in mapping schema",
                mapping.target_column
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_of_truth_allows() {
        assert!(SourceOfTruth::SystemA.allows(SyncDirection::AToB));
        assert!(!SourceOfTruth::SystemA.allows(SyncDirection::BToA));
        assert!(SourceOfTruth::SystemB.allows(SyncDirection::BToA));
        assert!(!SourceOfTruth::SystemB.allows(SyncDirection::AToB));
        assert!(SourceOfTruth::Both.allows(SyncDirection::AToB));
        assert!(SourceOfTruth::Both.allows(SyncDirection::BToA));
    }

    #[test]
    fn test_field_for_end() {
        let mapping = FieldMapping::owned_by_a("content", "text", "Description");
        assert_eq!(mapping.field_for(SystemEnd::A), "content");
        assert_eq!(mapping.field_for(SystemEnd::B), "text");
    }

    #[test]
    fn test_validate_rejects_duplicate_target() {
        let mappings = vec![
            FieldMapping::owned_by_a("content", "text", "Description"),
            FieldMapping::owned_by_b("status", "text", "Status"),
        ];
        let err = validate_mappings(&mappings).unwrap_err();
        assert!(err.to_string().contains("duplicate target column"));
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let mappings = vec![FieldMapping::owned_by_a("", "text", "Description")];
        assert!(validate_mappings(&mappings).is_err());
    }

    #[test]
    fn test_validate_accepts_clean_schema() {
        let mappings = vec![
            FieldMapping::owned_by_a("content", "text", "Description"),
            FieldMapping::owned_by_b("status", "status", "Status"),
            FieldMapping::shared("priority", "priority", "Priority"),
        ];
        assert!(validate_mappings(&mappings).is_ok());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "system_a".parse::<SourceOfTruth>().unwrap(),
            SourceOfTruth::SystemA
        );
        assert_eq!("both".parse::<SourceOfTruth>().unwrap(), SourceOfTruth::Both);
        assert!("neither".parse::<SourceOfTruth>().is_err());
    }
}
