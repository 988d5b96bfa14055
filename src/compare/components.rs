use crate::distance::{canonical_name, ComponentDistance, ElementKind};
use crate::matcher::DEFAULT_MATCH_THRESHOLD;
use crate::normalize::{Normalizer, RawToken};
use crate::types::{Category, ComponentToken, Snapshot, Token};
use crate::Result;

use super::{compare_tokens, CategoryComparison, Comparator, Deduplicate};

/// Matches design components to web elements by name and element kind.
#[derive(Debug, Clone, Copy)]
pub struct ComponentComparator {
    pub threshold: f64,
}

impl Default for ComponentComparator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

/// Tokens fold when their names canonicalize alike and their kinds land in
/// the same element class.
impl Deduplicate for ComponentToken {
    type Key = (String, ElementKind);

    fn dedup_key(&self) -> (String, ElementKind) {
        (canonical_name(&self.name), ElementKind::classify(&self.kind))
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn add_frequency(&mut self, count: u32) {
        self.frequency = self.frequency.saturating_add(count);
    }
}

fn component_tokens(snapshot: &Snapshot) -> Vec<Token> {
    let normalizer = Normalizer::default();
    snapshot
        .components
        .iter()
        .map(|raw| normalizer.normalize(RawToken::Component(raw), Category::Components))
        .collect()
}

fn as_component(token: Token) -> std::result::Result<ComponentToken, Token> {
    match token {
        Token::Component(component) => Ok(component),
        other => Err(other),
    }
}

impl Comparator for ComponentComparator {
    fn category(&self) -> Category {
        Category::Components
    }

    fn fingerprint(&self) -> String {
        format!("components@{}", self.threshold)
    }

    fn compare(&self, design: &Snapshot, implementation: &Snapshot) -> Result<CategoryComparison> {
        compare_tokens(
            Category::Components,
            component_tokens(design),
            component_tokens(implementation),
            as_component,
            &ComponentDistance,
            self.threshold,
        )
    }
}
