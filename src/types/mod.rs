//! Core data types used throughout the DPM library.
//!
//! - [`Snapshot`] - Flat extraction output for one side
//! - [`Token`] - Normalized visual primitive or structural element
//! - [`CategoryResult`] / [`ComparisonReport`] - Matching results

mod report;
mod snapshot;
mod token;

pub use report::{
    CategoryOutcome, CategoryResult, ComparisonReport, DataQuality, DataQualityNote, MatchPair,
};
pub use snapshot::{RawComponent, RawTypography, RawValue, Snapshot};
pub use token::{
    Category, ColorToken, ComponentToken, InvalidToken, LineHeight, Rgb, Side, SpacingToken,
    Token, TypographyToken,
};
