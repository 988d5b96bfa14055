use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, generate_top_issues, DEFAULT_MAX_TOP_ISSUES};
use crate::cache::{ReportCache, ReportKey};
use crate::config::{Config, MatchThresholds};
use crate::normalize::DEFAULT_REM_BASE_PX;
use crate::types::{
    Category, CategoryOutcome, ComparisonReport, DataQuality, DataQualityNote, Snapshot,
};
use crate::Result;

use super::{
    CategoryComparison, ColorComparator, Comparator, ComponentComparator, SpacingComparator,
    TypographyComparator,
};

/// Outcome of one comparator after the fan-in.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRun {
    pub category: Category,
    pub outcome: CategoryOutcome,
    pub notes: Vec<DataQualityNote>,
}

/// Returns one comparator per category.
pub fn default_comparators(
    thresholds: &MatchThresholds,
    rem_base_px: f64,
) -> Vec<Box<dyn Comparator>> {
    vec![
        Box::new(ColorComparator {
            threshold: thresholds.colors,
        }),
        Box::new(TypographyComparator {
            threshold: thresholds.typography,
            rem_base_px,
        }),
        Box::new(SpacingComparator {
            threshold: thresholds.spacing,
            rem_base_px,
        }),
        Box::new(ComponentComparator {
            threshold: thresholds.components,
        }),
    ]
}

/// Runs every comparator on its own scoped thread and collects the results in
/// comparator order. A comparator that returns an error or panics yields an
/// `Errored` outcome; the others are unaffected.
pub fn run_comparators(
    comparators: &[Box<dyn Comparator>],
    design: &Snapshot,
    implementation: &Snapshot,
) -> Vec<CategoryRun> {
    thread::scope(|scope| {
        let spawned: Vec<_> = comparators
            .iter()
            .map(|comparator| {
                let handle = thread::Builder::new()
                    .name(format!("dpm-{}", comparator.category()))
                    .spawn_scoped(scope, move || comparator.compare(design, implementation));
                (comparator, handle)
            })
            .collect();

        spawned
            .into_iter()
            .map(|(comparator, handle)| {
                let category = comparator.category();
                let joined = match handle {
                    Ok(handle) => handle.join(),
                    Err(err) => {
                        warn!(%category, error = %err, "could not spawn comparator thread, running inline");
                        panic::catch_unwind(AssertUnwindSafe(|| {
                            comparator.compare(design, implementation)
                        }))
                    }
                };
                into_run(category, joined)
            })
            .collect()
    })
}

fn into_run(
    category: Category,
    joined: std::thread::Result<Result<CategoryComparison>>,
) -> CategoryRun {
    match joined {
        Ok(Ok(comparison)) => CategoryRun {
            category,
            outcome: CategoryOutcome::Compared(comparison.result),
            notes: comparison.notes,
        },
        Ok(Err(err)) => {
            warn!(%category, error = %err, "category comparison failed");
            CategoryRun {
                category,
                outcome: CategoryOutcome::Errored {
                    message: err.to_string(),
                },
                notes: Vec::new(),
            }
        }
        Err(payload) => {
            let message = format!("comparator panicked: {}", panic_message(payload.as_ref()));
            warn!(%category, %message, "category comparison failed");
            CategoryRun {
                category,
                outcome: CategoryOutcome::Errored { message },
                notes: Vec::new(),
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Compares a design snapshot against an implementation snapshot.
///
/// The engine holds no state between calls beyond its comparators, so one
/// instance can be shared freely.
pub struct Engine {
    comparators: Vec<Box<dyn Comparator>>,
    max_top_issues: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(default_comparators(
            &MatchThresholds::default(),
            DEFAULT_REM_BASE_PX,
        ))
    }
}

impl Engine {
    pub fn new(comparators: Vec<Box<dyn Comparator>>) -> Self {
        Self {
            comparators,
            max_top_issues: DEFAULT_MAX_TOP_ISSUES,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(default_comparators(&config.thresholds, config.rem_base_px))
    }

    /// Keeps only the comparators for `categories`. An empty slice keeps all.
    pub fn only(mut self, categories: &[Category]) -> Self {
        if !categories.is_empty() {
            self.comparators
                .retain(|comparator| categories.contains(&comparator.category()));
        }
        self
    }

    pub fn with_max_top_issues(mut self, max_top_issues: usize) -> Self {
        self.max_top_issues = max_top_issues;
        self
    }

    pub fn categories(&self) -> Vec<Category> {
        self.comparators.iter().map(|c| c.category()).collect()
    }

    fn fingerprints(&self) -> Vec<String> {
        let mut fingerprints: Vec<String> =
            self.comparators.iter().map(|c| c.fingerprint()).collect();
        fingerprints.push(format!("top{}", self.max_top_issues));
        fingerprints
    }

    /// Runs every comparator and aggregates the result. An absent side is
    /// compared as an empty snapshot; a report is always produced.
    pub fn compare(
        &self,
        design: Option<&Snapshot>,
        implementation: Option<&Snapshot>,
    ) -> ComparisonReport {
        let empty = Snapshot::default();
        if design.is_none() {
            info!("design snapshot absent, comparing against an empty set");
        }
        if implementation.is_none() {
            info!("implementation snapshot absent, comparing against an empty set");
        }
        let design = design.unwrap_or(&empty);
        let implementation = implementation.unwrap_or(&empty);

        let runs = run_comparators(&self.comparators, design, implementation);

        let mut per_category = BTreeMap::new();
        let mut notes = Vec::new();
        for run in runs {
            notes.extend(run.notes);
            per_category.insert(run.category, run.outcome);
        }

        let mut report = aggregate(per_category, DataQuality::from_notes(notes));
        report.top_issues = generate_top_issues(&report.per_category, self.max_top_issues);
        debug!(
            overall = report.overall_similarity,
            matches = report.matches,
            deviations = report.deviations,
            unparseable = report.data_quality.unparseable,
            "comparison finished"
        );
        report
    }

    /// Like [`Engine::compare`], but consults `cache` first and stores fresh
    /// reports in it.
    pub fn compare_cached(
        &self,
        cache: &mut dyn ReportCache,
        design: Option<&Snapshot>,
        implementation: Option<&Snapshot>,
    ) -> Result<ComparisonReport> {
        let key = ReportKey::for_snapshots(design, implementation, &self.fingerprints())?;
        if let Some(report) = cache.get(&key) {
            debug!(?key, "report cache hit");
            return Ok(report);
        }

        let report = self.compare(design, implementation);
        cache.insert(key, report.clone());
        Ok(report)
    }
}
