use crate::distance::{canonical_family, TypographyDistance, NORMAL_LINE_HEIGHT};
use crate::matcher::DEFAULT_MATCH_THRESHOLD;
use crate::normalize::{Normalizer, RawToken, DEFAULT_REM_BASE_PX};
use crate::types::{Category, Snapshot, Token, TypographyToken};
use crate::Result;

use super::{compare_tokens, float_key, CategoryComparison, Comparator, Deduplicate};

#[derive(Debug, Clone, Copy)]
pub struct TypographyComparator {
    pub threshold: f64,
    /// Rem base for snapshots that do not declare their own
    pub rem_base_px: f64,
}

impl Default for TypographyComparator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            rem_base_px: DEFAULT_REM_BASE_PX,
        }
    }
}

/// Everything [`TypographyDistance`] looks at, so two tokens share a key
/// exactly when their distance is 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct TypographyKey {
    family: String,
    size: u64,
    weight: u64,
    line_height_px: u64,
}

impl Deduplicate for TypographyToken {
    type Key = TypographyKey;

    fn dedup_key(&self) -> TypographyKey {
        TypographyKey {
            family: canonical_family(&self.font_family),
            size: float_key(self.font_size_px),
            weight: float_key(self.font_weight),
            line_height_px: float_key(
                self.line_height_px()
                    .unwrap_or(self.font_size_px * NORMAL_LINE_HEIGHT),
            ),
        }
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn add_frequency(&mut self, count: u32) {
        self.frequency = self.frequency.saturating_add(count);
    }
}

fn as_typography(token: Token) -> std::result::Result<TypographyToken, Token> {
    match token {
        Token::Typography(typography) => Ok(typography),
        other => Err(other),
    }
}

impl TypographyComparator {
    fn tokens(&self, snapshot: &Snapshot) -> Vec<Token> {
        let normalizer = Normalizer::for_snapshot(snapshot, self.rem_base_px);
        snapshot
            .typography
            .iter()
            .map(|raw| normalizer.normalize(RawToken::Typography(raw), Category::Typography))
            .collect()
    }
}

impl Comparator for TypographyComparator {
    fn category(&self) -> Category {
        Category::Typography
    }

    fn fingerprint(&self) -> String {
        format!("typography@{}/rem{}", self.threshold, self.rem_base_px)
    }

    fn compare(&self, design: &Snapshot, implementation: &Snapshot) -> Result<CategoryComparison> {
        compare_tokens(
            Category::Typography,
            self.tokens(design),
            self.tokens(implementation),
            as_typography,
            &TypographyDistance,
            self.threshold,
        )
    }
}
