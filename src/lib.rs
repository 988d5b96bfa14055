//! Design Parity Matcher (DPM) Library
//!
//! Matches design tokens and components extracted from a design tool against
//! the ones scraped from a rendered web page, category by category, and
//! scores how closely the implementation follows the design.
//!
//! # Module Overview
//!
//! - [`normalize`] - Raw style values to comparable tokens
//! - [`distance`] - Per-category distance functions
//! - [`matcher`] - Greedy bipartite matching with a threshold
//! - [`compare`] - Category comparators and the parallel [`Engine`]
//! - [`aggregate`] - Overall score and top issues
//! - [`cache`] - Caller-owned report cache
//! - [`config`] - Configuration file support
//! - [`loader`] - Snapshot file loading (JSON / YAML)
//! - [`types`] - Core data types and structures
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```
//! use dpm_lib::{Engine, RawValue, Snapshot};
//!
//! let design = Snapshot {
//!     colors: vec![RawValue::from("#000000"), RawValue::from("#ffffff")],
//!     ..Snapshot::default()
//! };
//! let implementation = design.clone();
//!
//! let report = Engine::default().compare(Some(&design), Some(&implementation));
//! assert_eq!(report.matches, 2);
//! assert_eq!(report.overall_similarity, 100.0);
//! ```

pub mod aggregate;
pub mod cache;
pub mod compare;
pub mod config;
pub mod distance;
pub mod error;
pub mod loader;
pub mod logging;
pub mod matcher;
pub mod normalize;
pub mod output;
pub mod types;

pub use aggregate::{aggregate, generate_top_issues, DEFAULT_MAX_TOP_ISSUES};
pub use cache::{InMemoryReportCache, ReportCache, ReportKey};
pub use compare::{
    default_comparators, run_comparators, CategoryComparison, CategoryRun, ColorComparator,
    Comparator, ComponentComparator, Engine, SpacingComparator, TypographyComparator,
};
pub use config::{CacheConfig, Config, ConfigError, MatchThresholds};
pub use distance::{
    ColorDistance, ComponentDistance, ElementKind, SpacingDistance, TokenDistance,
    TypographyDistance,
};
pub use error::{DpmError, ErrorCategory, ErrorPayload, Result};
pub use loader::{load_snapshot, parse_snapshot, SnapshotFormat};
pub use matcher::{match_sets, DEFAULT_MATCH_THRESHOLD};
pub use normalize::{NormalizedTokens, Normalizer, RawToken};
pub use output::{
    CompareOutput, DpmOutput, ErrorOutput, ExtractOutput, NormalizeOutput, SourceDescriptor,
    DPM_OUTPUT_VERSION,
};
pub use types::{
    Category, CategoryOutcome, CategoryResult, ColorToken, ComparisonReport, ComponentToken,
    DataQuality, DataQualityNote, InvalidToken, LineHeight, MatchPair, RawComponent,
    RawTypography, RawValue, Rgb, Side, Snapshot, SpacingToken, Token, TypographyToken,
};
