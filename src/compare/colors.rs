use crate::distance::ColorDistance;
use crate::matcher::DEFAULT_MATCH_THRESHOLD;
use crate::normalize::{Normalizer, RawToken};
use crate::types::{Category, ColorToken, Rgb, Snapshot, Token};
use crate::Result;

use super::{compare_tokens, CategoryComparison, Comparator, Deduplicate};

#[derive(Debug, Clone, Copy)]
pub struct ColorComparator {
    pub threshold: f64,
}

impl Default for ColorComparator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl Deduplicate for ColorToken {
    type Key = Rgb;

    fn dedup_key(&self) -> Rgb {
        self.rgb
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn add_frequency(&mut self, count: u32) {
        self.frequency = self.frequency.saturating_add(count);
    }
}

fn color_tokens(snapshot: &Snapshot) -> Vec<Token> {
    let normalizer = Normalizer::default();
    snapshot
        .colors
        .iter()
        .map(|raw| normalizer.normalize(RawToken::Value(raw), Category::Colors))
        .collect()
}

fn as_color(token: Token) -> std::result::Result<ColorToken, Token> {
    match token {
        Token::Color(color) => Ok(color),
        other => Err(other),
    }
}

impl Comparator for ColorComparator {
    fn category(&self) -> Category {
        Category::Colors
    }

    fn fingerprint(&self) -> String {
        format!("colors@{}", self.threshold)
    }

    fn compare(&self, design: &Snapshot, implementation: &Snapshot) -> Result<CategoryComparison> {
        compare_tokens(
            Category::Colors,
            color_tokens(design),
            color_tokens(implementation),
            as_color,
            &ColorDistance,
            self.threshold,
        )
    }
}
