//! Greedy bipartite matching of design tokens against implementation tokens.
//!
//! This is a greedy nearest-first approximation of optimal assignment, not
//! the Hungarian algorithm. It runs in O(n·m·log(n·m)), is deterministic, and
//! token sets here are small and dominated by near-duplicates, where greedy
//! and optimal pairings almost always coincide. An optimal solver can replace
//! [`match_sets`] without changing its signature.

use std::cmp::Ordering;

use crate::distance::TokenDistance;
use crate::types::{CategoryResult, MatchPair};

/// Default minimum similarity (0-100) for a pair to be committed.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    design: usize,
    implementation: usize,
    distance: f64,
}

/// Pairs tokens nearest-first and returns matched pairs plus leftovers.
///
/// Pairs are committed in ascending distance order (ties broken by design
/// index, then implementation index) when neither token is taken yet, the
/// distance is finite and the similarity is at least `threshold`.
pub fn match_sets<T, D>(
    design: &[T],
    implementation: &[T],
    distance: &D,
    threshold: f64,
) -> CategoryResult<T>
where
    T: Clone,
    D: TokenDistance<T> + ?Sized,
{
    let mut candidates = Vec::with_capacity(design.len() * implementation.len());
    for (di, d) in design.iter().enumerate() {
        for (ii, i) in implementation.iter().enumerate() {
            candidates.push(Candidate {
                design: di,
                implementation: ii,
                distance: distance.distance(d, i),
            });
        }
    }

    candidates.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or_else(|| nan_last(a.distance, b.distance))
            .then_with(|| a.design.cmp(&b.design))
            .then_with(|| a.implementation.cmp(&b.implementation))
    });

    let mut design_used = vec![false; design.len()];
    let mut impl_used = vec![false; implementation.len()];
    let mut matched = Vec::new();

    for candidate in candidates {
        if design_used[candidate.design] || impl_used[candidate.implementation] {
            continue;
        }
        if !candidate.distance.is_finite() {
            // Sorted ascending: everything after this is infinite or NaN too.
            break;
        }
        let similarity = distance.similarity(candidate.distance);
        if similarity < threshold {
            continue;
        }
        design_used[candidate.design] = true;
        impl_used[candidate.implementation] = true;
        matched.push(MatchPair {
            design: design[candidate.design].clone(),
            implementation: implementation[candidate.implementation].clone(),
            similarity,
        });
    }

    let missing = unused(design, &design_used);
    let extra = unused(implementation, &impl_used);

    let similarity = if !matched.is_empty() {
        matched.iter().map(|p| p.similarity).sum::<f64>() / matched.len() as f64
    } else if design.is_empty() && implementation.is_empty() {
        100.0
    } else {
        0.0
    };

    CategoryResult {
        matched,
        missing,
        extra,
        similarity,
    }
}

fn unused<T: Clone>(tokens: &[T], used: &[bool]) -> Vec<T> {
    tokens
        .iter()
        .zip(used)
        .filter(|(_, used)| !**used)
        .map(|(token, _)| token.clone())
        .collect()
}

fn nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}
