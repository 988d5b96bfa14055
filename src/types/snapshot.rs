//! Flat snapshot format produced by the extraction collaborators.
//!
//! Both the Figma extractor and the web scraper emit the same shape, so the
//! engine never needs to know which tool produced a snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw style value: style data mixes numbers and strings freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// Font properties of one text style, as extracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTypography {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "fontSizePx")]
    pub font_size: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<RawValue>,
    /// CSS-style line height: a bare number is a multiplier of the font size
    /// (`1.5`), a value with a unit is a length (`24px`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<RawValue>,
    /// Absolute line height in px, as design tools export it. Takes
    /// precedence over `line_height`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height_px: Option<RawValue>,
}

/// A named design component or DOM element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComponent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "type")]
    pub kind: Option<String>,
}

/// One side of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<RawValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub typography: Vec<RawTypography>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spacing: Vec<RawValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<RawComponent>,
    /// Root font size used to resolve `rem` values; defaults to 16px.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rem_base_px: Option<f64>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.typography.is_empty()
            && self.spacing.is_empty()
            && self.components.is_empty()
    }
}
