use crate::error::ErrorPayload;
use crate::normalize::NormalizedTokens;
use crate::types::ComparisonReport;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema version for output payloads.
pub const DPM_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DpmOutput {
    Compare(CompareOutput),
    Extract(ExtractOutput),
    Normalize(NormalizeOutput),
    Error(ErrorOutput),
}

/// Where a snapshot came from and whether it could be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub path: PathBuf,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceDescriptor {
    pub fn available(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            available: true,
            error: None,
        }
    }

    pub fn unavailable(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            available: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOutput {
    pub version: String,
    pub design: SourceDescriptor,
    #[serde(rename = "impl")]
    pub implementation: SourceDescriptor,
    /// Overall similarity (0-100) needed to pass
    pub pass_threshold: f64,
    pub passed: bool,
    pub report: ComparisonReport,
}

/// Normalized tokens of both sides, emitted when comparison is skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOutput {
    pub version: String,
    pub design: SourceDescriptor,
    #[serde(rename = "impl")]
    pub implementation: SourceDescriptor,
    pub design_tokens: NormalizedTokens,
    pub implementation_tokens: NormalizedTokens,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeOutput {
    pub version: String,
    pub input: SourceDescriptor,
    pub rem_base_px: f64,
    pub unparseable: usize,
    pub tokens: NormalizedTokens,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
