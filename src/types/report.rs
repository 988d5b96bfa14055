//! Comparison result types.
//!
//! These are built once per comparison and never mutated afterwards, so they
//! can be cached and serialized as-is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::token::{Category, Side, Token};

/// A committed correspondence between a design token and an implementation token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPair<T = Token> {
    pub design: T,
    pub implementation: T,
    /// Similarity score (0.0 - 100.0)
    pub similarity: f64,
}

/// Outcome of matching one category.
///
/// `matched.len() + missing.len()` is always the size of the design set and
/// `matched.len() + extra.len()` the size of the implementation set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct CategoryResult<T = Token> {
    #[serde(default)]
    pub matched: Vec<MatchPair<T>>,
    /// Design-only tokens
    #[serde(default)]
    pub missing: Vec<T>,
    /// Implementation-only tokens
    #[serde(default)]
    pub extra: Vec<T>,
    /// Similarity score (0.0 - 100.0)
    pub similarity: f64,
}

impl<T> CategoryResult<T> {
    pub fn design_count(&self) -> usize {
        self.matched.len() + self.missing.len()
    }

    pub fn implementation_count(&self) -> usize {
        self.matched.len() + self.extra.len()
    }

    /// Aggregation weight: the size of the larger side.
    pub fn weight(&self) -> usize {
        self.design_count().max(self.implementation_count())
    }

    pub fn deviations(&self) -> usize {
        self.missing.len() + self.extra.len()
    }

    pub fn map_tokens<U>(self, f: impl Fn(T) -> U) -> CategoryResult<U> {
        CategoryResult {
            matched: self
                .matched
                .into_iter()
                .map(|pair| MatchPair {
                    design: f(pair.design),
                    implementation: f(pair.implementation),
                    similarity: pair.similarity,
                })
                .collect(),
            missing: self.missing.into_iter().map(&f).collect(),
            extra: self.extra.into_iter().map(&f).collect(),
            similarity: self.similarity,
        }
    }
}

/// Per-category entry of a report: either a result or an explicit error marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CategoryOutcome {
    Compared(CategoryResult),
    Errored { message: String },
}

impl CategoryOutcome {
    pub fn result(&self) -> Option<&CategoryResult> {
        match self {
            CategoryOutcome::Compared(result) => Some(result),
            CategoryOutcome::Errored { .. } => None,
        }
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, CategoryOutcome::Errored { .. })
    }
}

/// A raw value that could not be normalized and was left out of matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityNote {
    pub category: Category,
    pub side: Side,
    pub raw: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Number of entries excluded as unparseable
    pub unparseable: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<DataQualityNote>,
}

impl DataQuality {
    pub fn from_notes(notes: Vec<DataQualityNote>) -> Self {
        Self {
            unparseable: notes.len(),
            notes,
        }
    }
}

/// Full result of comparing a design snapshot against an implementation snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub per_category: BTreeMap<Category, CategoryOutcome>,
    /// Similarity score (0.0 - 100.0)
    pub overall_similarity: f64,
    pub total_comparisons: usize,
    pub matches: usize,
    pub deviations: usize,
    #[serde(default)]
    pub data_quality: DataQuality,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_issues: Vec<String>,
}

impl ComparisonReport {
    pub fn category(&self, category: Category) -> Option<&CategoryResult> {
        self.per_category.get(&category).and_then(|o| o.result())
    }
}
