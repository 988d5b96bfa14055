//! Combines per-category outcomes into a [`ComparisonReport`] and ranks the
//! most important deviations for humans.

use std::collections::BTreeMap;

use crate::types::{Category, CategoryOutcome, ComparisonReport, DataQuality, Token};

pub const DEFAULT_MAX_TOP_ISSUES: usize = 10;

/// Matched pairs below this similarity are reported as minor issues.
const MINOR_ISSUE_SIMILARITY: f64 = 90.0;

/// Builds the report from per-category outcomes.
///
/// `overall_similarity` is the average of category similarities weighted by
/// `max(|design|, |implementation|)`. Empty and errored categories carry no
/// weight. With no weight at all the result is 100, unless a category
/// errored, in which case it is 0.
pub fn aggregate(
    per_category: BTreeMap<Category, CategoryOutcome>,
    data_quality: DataQuality,
) -> ComparisonReport {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0usize;
    let mut total_comparisons = 0;
    let mut matches = 0;
    let mut deviations = 0;

    for result in per_category.values().filter_map(CategoryOutcome::result) {
        let weight = result.weight();
        weighted_sum += result.similarity * weight as f64;
        total_weight += weight;
        total_comparisons += result.matched.len() + result.missing.len() + result.extra.len();
        matches += result.matched.len();
        deviations += result.deviations();
    }

    let any_errored = per_category.values().any(CategoryOutcome::is_errored);
    let overall_similarity = if total_weight > 0 {
        (weighted_sum / total_weight as f64).clamp(0.0, 100.0)
    } else if any_errored {
        0.0
    } else {
        100.0
    };

    ComparisonReport {
        per_category,
        overall_similarity,
        total_comparisons,
        matches,
        deviations,
        data_quality,
        top_issues: Vec::new(),
    }
}

#[derive(Debug, Clone)]
struct RankedIssue {
    severity_rank: u8,
    priority_rank: u8,
    message: String,
}

impl RankedIssue {
    fn new(severity_rank: u8, category: Category, message: impl Into<String>) -> Self {
        Self {
            severity_rank,
            priority_rank: category as u8,
            message: message.into(),
        }
    }

    fn major(category: Category, message: impl Into<String>) -> Self {
        Self::new(0, category, message)
    }

    fn moderate(category: Category, message: impl Into<String>) -> Self {
        Self::new(1, category, message)
    }

    fn minor(category: Category, message: impl Into<String>) -> Self {
        Self::new(2, category, message)
    }
}

/// Ranked, human-readable deviations: errored categories and missing tokens
/// first, then extra tokens, then weak matches.
pub fn generate_top_issues(
    per_category: &BTreeMap<Category, CategoryOutcome>,
    max_issues: usize,
) -> Vec<String> {
    let mut issues: Vec<RankedIssue> = Vec::new();

    for (&category, outcome) in per_category {
        match outcome {
            CategoryOutcome::Errored { message } => issues.push(RankedIssue::major(
                category,
                format!("{category} could not be compared: {message}"),
            )),
            CategoryOutcome::Compared(result) => {
                issues.extend(result.missing.iter().map(|token| {
                    RankedIssue::major(
                        category,
                        format!("{} {} is missing in the implementation.", noun(category), token)
                            + &frequency_suffix(token),
                    )
                }));
                issues.extend(result.extra.iter().map(|token| {
                    RankedIssue::moderate(
                        category,
                        format!(
                            "{} {} appears in the implementation but not in the design.",
                            noun(category),
                            token
                        ),
                    )
                }));
                issues.extend(
                    result
                        .matched
                        .iter()
                        .filter(|pair| pair.similarity < MINOR_ISSUE_SIMILARITY)
                        .map(|pair| {
                            RankedIssue::minor(
                                category,
                                format!(
                                    "{} {} is implemented as {} ({:.1}% similar).",
                                    noun(category),
                                    pair.design,
                                    pair.implementation,
                                    pair.similarity
                                ),
                            )
                        }),
                );
            }
        }
    }

    issues.sort_by(|a, b| {
        a.severity_rank
            .cmp(&b.severity_rank)
            .then_with(|| a.priority_rank.cmp(&b.priority_rank))
            .then_with(|| a.message.cmp(&b.message))
    });
    issues
        .into_iter()
        .take(max_issues)
        .map(|i| i.message)
        .collect()
}

fn noun(category: Category) -> &'static str {
    match category {
        Category::Colors => "Color",
        Category::Typography => "Text style",
        Category::Spacing => "Spacing",
        Category::Components => "Component",
    }
}

fn frequency_suffix(token: &Token) -> String {
    match token.frequency() {
        0 | 1 => String::new(),
        n => format!(" Used {n} times in the design."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryResult, ColorToken, MatchPair, Rgb, SpacingToken};

    fn color(hex: &str, r: u8, g: u8, b: u8) -> Token {
        Token::Color(ColorToken {
            rgb: Rgb::new(r, g, b),
            raw: hex.to_string(),
            frequency: 1,
        })
    }

    fn spacing(px: f64) -> Token {
        Token::Spacing(SpacingToken {
            value_px: px,
            raw: format!("{px}px"),
            frequency: 1,
        })
    }

    fn compared(result: CategoryResult) -> CategoryOutcome {
        CategoryOutcome::Compared(result)
    }

    fn empty_result() -> CategoryResult {
        CategoryResult {
            matched: Vec::new(),
            missing: Vec::new(),
            extra: Vec::new(),
            similarity: 100.0,
        }
    }

    #[test]
    fn overall_is_weighted_by_larger_side() {
        let colors = CategoryResult {
            matched: vec![MatchPair {
                design: color("#000", 0, 0, 0),
                implementation: color("#000", 0, 0, 0),
                similarity: 100.0,
            }],
            missing: Vec::new(),
            extra: Vec::new(),
            similarity: 100.0,
        };
        // weight 3 (three design tokens, none matched)
        let spacing = CategoryResult {
            matched: Vec::new(),
            missing: vec![spacing(4.0), spacing(8.0), spacing(16.0)],
            extra: Vec::new(),
            similarity: 0.0,
        };

        let mut per_category = BTreeMap::new();
        per_category.insert(Category::Colors, compared(colors));
        per_category.insert(Category::Spacing, compared(spacing));
        let report = aggregate(per_category, DataQuality::default());

        assert!((report.overall_similarity - 25.0).abs() < 1e-9);
        assert_eq!(report.total_comparisons, 4);
        assert_eq!(report.matches, 1);
        assert_eq!(report.deviations, 3);
    }

    #[test]
    fn empty_categories_do_not_contribute() {
        let mut per_category = BTreeMap::new();
        per_category.insert(Category::Colors, compared(empty_result()));
        per_category.insert(
            Category::Spacing,
            compared(CategoryResult {
                matched: Vec::new(),
                missing: vec![spacing(4.0)],
                extra: Vec::new(),
                similarity: 0.0,
            }),
        );
        let report = aggregate(per_category, DataQuality::default());
        assert_eq!(report.overall_similarity, 0.0);
    }

    #[test]
    fn all_empty_is_perfect() {
        let per_category = Category::all()
            .into_iter()
            .map(|c| (c, compared(empty_result())))
            .collect();
        let report = aggregate(per_category, DataQuality::default());
        assert_eq!(report.overall_similarity, 100.0);
        assert_eq!(report.total_comparisons, 0);
    }

    #[test]
    fn all_errored_is_zero() {
        let per_category = Category::all()
            .into_iter()
            .map(|c| {
                (
                    c,
                    CategoryOutcome::Errored {
                        message: "boom".to_string(),
                    },
                )
            })
            .collect();
        let report = aggregate(per_category, DataQuality::default());
        assert_eq!(report.overall_similarity, 0.0);
        assert_eq!(report.per_category.len(), 4);
    }

    #[test]
    fn errored_category_carries_no_weight() {
        let mut per_category = BTreeMap::new();
        per_category.insert(
            Category::Colors,
            compared(CategoryResult {
                matched: vec![MatchPair {
                    design: color("#fff", 255, 255, 255),
                    implementation: color("#fff", 255, 255, 255),
                    similarity: 100.0,
                }],
                missing: Vec::new(),
                extra: Vec::new(),
                similarity: 100.0,
            }),
        );
        per_category.insert(
            Category::Typography,
            CategoryOutcome::Errored {
                message: "boom".to_string(),
            },
        );
        let report = aggregate(per_category, DataQuality::default());
        assert_eq!(report.overall_similarity, 100.0);
    }

    #[test]
    fn top_issues_rank_missing_before_extra_before_weak_matches() {
        let mut per_category = BTreeMap::new();
        per_category.insert(
            Category::Colors,
            compared(CategoryResult {
                matched: vec![MatchPair {
                    design: color("#000000", 0, 0, 0),
                    implementation: color("#202020", 32, 32, 32),
                    similarity: 87.4,
                }],
                missing: Vec::new(),
                extra: vec![color("#ff0000", 255, 0, 0)],
                similarity: 87.4,
            }),
        );
        per_category.insert(
            Category::Spacing,
            compared(CategoryResult {
                matched: Vec::new(),
                missing: vec![spacing(12.0)],
                extra: Vec::new(),
                similarity: 0.0,
            }),
        );

        let issues = generate_top_issues(&per_category, 10);
        assert_eq!(
            issues,
            vec![
                "Spacing 12px is missing in the implementation.".to_string(),
                "Color #ff0000 appears in the implementation but not in the design.".to_string(),
                "Color #000000 is implemented as #202020 (87.4% similar).".to_string(),
            ]
        );

        assert_eq!(generate_top_issues(&per_category, 1).len(), 1);
    }

    #[test]
    fn top_issues_mention_errored_categories() {
        let mut per_category = BTreeMap::new();
        per_category.insert(
            Category::Components,
            CategoryOutcome::Errored {
                message: "boom".to_string(),
            },
        );
        let issues = generate_top_issues(&per_category, 10);
        assert_eq!(issues, vec!["components could not be compared: boom".to_string()]);
    }
}
