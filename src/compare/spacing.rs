use crate::distance::SpacingDistance;
use crate::matcher::DEFAULT_MATCH_THRESHOLD;
use crate::normalize::{Normalizer, RawToken, DEFAULT_REM_BASE_PX};
use crate::types::{Category, Snapshot, SpacingToken, Token};
use crate::Result;

use super::{compare_tokens, float_key, CategoryComparison, Comparator, Deduplicate};

#[derive(Debug, Clone, Copy)]
pub struct SpacingComparator {
    pub threshold: f64,
    /// Rem base for snapshots that do not declare their own
    pub rem_base_px: f64,
}

impl Default for SpacingComparator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            rem_base_px: DEFAULT_REM_BASE_PX,
        }
    }
}

impl Deduplicate for SpacingToken {
    type Key = u64;

    fn dedup_key(&self) -> u64 {
        float_key(self.value_px)
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn add_frequency(&mut self, count: u32) {
        self.frequency = self.frequency.saturating_add(count);
    }
}

fn as_spacing(token: Token) -> std::result::Result<SpacingToken, Token> {
    match token {
        Token::Spacing(spacing) => Ok(spacing),
        other => Err(other),
    }
}

impl SpacingComparator {
    fn tokens(&self, snapshot: &Snapshot) -> Vec<Token> {
        let normalizer = Normalizer::for_snapshot(snapshot, self.rem_base_px);
        snapshot
            .spacing
            .iter()
            .map(|raw| normalizer.normalize(RawToken::Value(raw), Category::Spacing))
            .collect()
    }
}

impl Comparator for SpacingComparator {
    fn category(&self) -> Category {
        Category::Spacing
    }

    fn fingerprint(&self) -> String {
        format!("spacing@{}/rem{}", self.threshold, self.rem_base_px)
    }

    fn compare(&self, design: &Snapshot, implementation: &Snapshot) -> Result<CategoryComparison> {
        compare_tokens(
            Category::Spacing,
            self.tokens(design),
            self.tokens(implementation),
            as_spacing,
            &SpacingDistance,
            self.threshold,
        )
    }
}
