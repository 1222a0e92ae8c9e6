//! Engine configuration.
//!
//! An explicit config value owned by the engine and consulted at pass
//! boundaries, never ambient globals. Replacing the mapping schema takes
//! effect on the next cycle because the engine state lock is held for a
//! whole cycle.

use serde::{Deserialize, Serialize};

use rmabridge_connector::mapping::FieldMapping;

/// Where each side carries the correlation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Property name on System A records.
    #[serde(default = "default_field_a")]
    pub field_a: String,
    /// Column id on System B records.
    #[serde(default = "default_column_b")]
    pub column_b: String,
}

fn default_field_a() -> String {
    "rma_number".to_string()
}

fn default_column_b() -> String {
    "text_mknfeq16".to_string()
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            field_a: default_field_a(),
            column_b: default_column_b(),
        }
    }
}

/// Configuration for the reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Whether cycles do any work. A disabled engine treats every pass
    /// as a no-op.
    #[serde(default)]
    pub enabled: bool,
    /// Correlation key location on each side.
    #[serde(default)]
    pub correlation: CorrelationConfig,
    /// Field mapping schema for one reconciliation run.
    #[serde(default = "default_mappings")]
    pub mappings: Vec<FieldMapping>,
    /// Capacity of the summary activity log.
    #[serde(default = "default_activity_capacity")]
    pub activity_capacity: usize,
    /// Capacity of the per-record outcome history.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_activity_capacity() -> usize {
    50
}

fn default_history_capacity() -> usize {
    200
}

/// The out-of-the-box mapping schema: description owned by System A,
/// status and priority owned by System B.
#[must_use]
pub fn default_mappings() -> Vec<FieldMapping> {
    vec![
        FieldMapping::owned_by_a("content", "text", "Description"),
        FieldMapping::owned_by_b("hs_pipeline_stage", "status", "Status"),
        FieldMapping::owned_by_b("hs_ticket_priority", "priority", "Priority"),
    ]
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            correlation: CorrelationConfig::default(),
            mappings: default_mappings(),
            activity_capacity: default_activity_capacity(),
            history_capacity: default_history_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.activity_capacity, 50);
        assert_eq!(config.history_capacity, 200);
        assert_eq!(config.mappings.len(), 3);
        assert_eq!(config.correlation.field_a, "rma_number");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: BridgeConfig = serde_json::from_str("{\"enabled\": true}").unwrap();
        assert!(config.enabled);
        assert_eq!(config.history_capacity, 200);
        assert!(!config.mappings.is_empty());
    }

    #[test]
    fn test_deserialize_custom_mapping() {
        let json = r#"{
            "correlation": { "field_a": "rma", "column_b": "text_1" },
            "mappings": [
                { "source_field": "subject", "target_column": "name", "label": "Subject", "source_of_truth": "both" }
            ]
        }"#;
        let config: BridgeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.correlation.column_b, "text_1");
        assert_eq!(config.mappings.len(), 1);
        assert_eq!(config.mappings[0].label, "Subject");
    }
}
