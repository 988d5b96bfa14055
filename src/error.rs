use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Category;

#[derive(Debug, Error)]
pub enum DpmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Comparison error in {category}: {message}")]
    Category { category: Category, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl DpmError {
    pub fn category(category: Category, message: impl Into<String>) -> Self {
        DpmError::Category {
            category,
            message: message.into(),
        }
    }

    pub fn snapshot(message: impl Into<String>) -> Self {
        DpmError::Snapshot(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            DpmError::Io(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            DpmError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Check that the snapshot is valid JSON in the flat token format.",
            ),
            DpmError::Yaml(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Check that the snapshot is valid YAML in the flat token format.",
            ),
            DpmError::Snapshot(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("unsupported snapshot extension") {
                    ErrorPayload::new(
                        ErrorCategory::Input,
                        msg.to_string(),
                        "Use a .json, .yaml or .yml snapshot file.",
                    )
                } else if lower.contains("not found") {
                    ErrorPayload::new(
                        ErrorCategory::Input,
                        msg.to_string(),
                        "Verify the snapshot exists; use an absolute path or run from the working directory.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Input,
                        msg.to_string(),
                        "Re-export the snapshot from the extraction step and retry.",
                    )
                }
            }
            DpmError::Category { category, message } => ErrorPayload::new(
                ErrorCategory::Comparison,
                format!("{category}: {message}"),
                "Inspect the tokens of this category; run with --verbose for details.",
            ),
            DpmError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("threshold") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Thresholds are similarity percentages; use values between 0 and 100.",
                    )
                } else if lower.contains("unknown category") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use one of: colors, typography, spacing, components.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags and the config file (~/.config/dpm/config.toml).",
                    )
                }
            }
            DpmError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, DpmError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Input,
    Comparison,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_payload_includes_threshold_hint() {
        let err = DpmError::Config("threshold for colors must be within 0..=100".to_string());
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Config);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("between 0 and 100"),
            "expected threshold remediation, got: {remediation}"
        );
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = DpmError::Config("Some other config issue".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("config.toml"),
            "expected default remediation for generic config errors"
        );
    }

    #[test]
    fn config_payload_lists_categories_for_unknown_category() {
        let err = DpmError::Config("Unknown category: borders".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("colors") && remediation.contains("components"),
            "expected category list, got: {remediation}"
        );
    }

    #[test]
    fn snapshot_payload_lists_supported_extensions() {
        let err = DpmError::snapshot("Unsupported snapshot extension 'xml'");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Input);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains(".json") && remediation.contains(".yaml"),
            "expected supported extensions, got: {remediation}"
        );
    }

    #[test]
    fn snapshot_payload_includes_path_hint_when_missing() {
        let err = DpmError::snapshot("Snapshot file not found: design.json");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.to_ascii_lowercase().contains("absolute path"),
            "expected path remediation, got: {remediation}"
        );
    }

    #[test]
    fn category_payload_names_the_category() {
        let err = DpmError::category(Category::Typography, "distance panicked");
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Comparison);
        assert!(payload.message.starts_with("typography:"));
    }
}
