//! Category comparators.
//!
//! One comparator per category normalizes both snapshots, moves unparseable
//! entries into data-quality notes, folds identical tokens together (summing
//! their frequencies) and runs the greedy matcher with the category's
//! distance function:
//! - Colors (RGB distance)
//! - Typography (font metrics with a family veto)
//! - Spacing (relative px difference)
//! - Components (name edit distance and element kind)

mod colors;
mod components;
mod engine;
mod spacing;
mod typography;


use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use tracing::{debug, warn};

use crate::distance::TokenDistance;
use crate::error::DpmError;
use crate::matcher::match_sets;
use crate::types::{Category, CategoryResult, DataQualityNote, Side, Snapshot, Token};
use crate::Result;

pub use colors::ColorComparator;
pub use components::ComponentComparator;
pub use engine::{default_comparators, run_comparators, CategoryRun, Engine};
pub use spacing::SpacingComparator;
pub use typography::TypographyComparator;

/// Result of one comparator: the matching plus any entries it had to exclude.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryComparison {
    pub result: CategoryResult,
    pub notes: Vec<DataQualityNote>,
}

/// Compares one category of a design snapshot against an implementation snapshot.
pub trait Comparator: Send + Sync {
    fn category(&self) -> Category;

    /// Stable description of everything that influences this comparator's
    /// output besides the snapshots; used for cache keys.
    fn fingerprint(&self) -> String {
        self.category().to_string()
    }

    fn compare(&self, design: &Snapshot, implementation: &Snapshot) -> Result<CategoryComparison>;
}

/// Tokens that can be folded together when identical.
pub(crate) trait Deduplicate {
    type Key: Eq + Hash;

    fn dedup_key(&self) -> Self::Key;
    fn frequency(&self) -> u32;
    fn add_frequency(&mut self, count: u32);
}

/// Hashable form of a float; `-0.0` and `0.0` share a key.
pub(crate) fn float_key(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

/// Collapses identical tokens, keeping first-seen order and summing frequencies.
pub(crate) fn dedupe<T: Deduplicate>(tokens: Vec<T>) -> Vec<T> {
    let mut index: HashMap<T::Key, usize> = HashMap::new();
    let mut unique: Vec<T> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match index.entry(token.dedup_key()) {
            Entry::Occupied(slot) => {
                let count = token.frequency();
                unique[*slot.get()].add_frequency(count);
            }
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(token);
            }
        }
    }

    unique
}

struct SideTokens<T> {
    tokens: Vec<T>,
    notes: Vec<DataQualityNote>,
}

fn collect_side<T: Deduplicate>(
    category: Category,
    side: Side,
    tokens: Vec<Token>,
    extract: fn(Token) -> std::result::Result<T, Token>,
) -> SideTokens<T> {
    let mut valid = Vec::with_capacity(tokens.len());
    let mut notes = Vec::new();

    for token in tokens {
        match token {
            Token::Invalid(invalid) => {
                warn!(
                    %category,
                    %side,
                    raw = %invalid.raw,
                    reason = %invalid.reason,
                    "excluding unparseable entry"
                );
                notes.push(DataQualityNote {
                    category,
                    side,
                    raw: invalid.raw,
                    reason: invalid.reason,
                });
            }
            other => match extract(other) {
                Ok(t) => valid.push(t),
                Err(unexpected) => notes.push(DataQualityNote {
                    category,
                    side,
                    raw: unexpected.to_string(),
                    reason: format!("unexpected token in {category}"),
                }),
            },
        }
    }

    SideTokens {
        tokens: dedupe(valid),
        notes,
    }
}

/// Shared body of every comparator: split out invalid tokens, dedupe, match.
fn compare_tokens<T, D>(
    category: Category,
    design: Vec<Token>,
    implementation: Vec<Token>,
    extract: fn(Token) -> std::result::Result<T, Token>,
    distance: &D,
    threshold: f64,
) -> Result<CategoryComparison>
where
    T: Deduplicate + Clone + Into<Token>,
    D: TokenDistance<T>,
{
    if !(0.0..=100.0).contains(&threshold) {
        return Err(DpmError::category(
            category,
            format!("threshold must be within 0..=100, got {threshold}"),
        ));
    }

    let design = collect_side(category, Side::Design, design, extract);
    let implementation = collect_side(category, Side::Implementation, implementation, extract);

    let result = match_sets(&design.tokens, &implementation.tokens, distance, threshold);
    debug!(
        %category,
        design = design.tokens.len(),
        implementation = implementation.tokens.len(),
        matched = result.matched.len(),
        missing = result.missing.len(),
        extra = result.extra.len(),
        similarity = result.similarity,
        "category matched"
    );

    let mut notes = design.notes;
    notes.extend(implementation.notes);

    Ok(CategoryComparison {
        result: result.map_tokens(Into::into),
        notes,
    })
}
