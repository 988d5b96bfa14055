//! Per-category distance functions.
//!
//! Every distance is total, symmetric and zero for tokens that are identical
//! after normalization. Each implementation also owns the conversion from its
//! distance to a 0-100 similarity, since the scales differ (RGB distance runs
//! up to ~441.67, the relative distances are already in [0, 1]).

use crate::types::{ColorToken, ComponentToken, Rgb, SpacingToken, TypographyToken};

/// `sqrt(3) * 255`: distance between black and white.
pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

/// CSS `line-height: normal` is roughly this multiple of the font size.
pub const NORMAL_LINE_HEIGHT: f64 = 1.2;

const SIZE_WEIGHT: f64 = 0.5;
const WEIGHT_WEIGHT: f64 = 0.3;
const LINE_HEIGHT_WEIGHT: f64 = 0.2;
const FONT_WEIGHT_RANGE: f64 = 800.0;

const NAME_WEIGHT: f64 = 0.8;
const KIND_WEIGHT: f64 = 0.2;

/// A dissimilarity measure between two tokens of one category.
pub trait TokenDistance<T> {
    fn distance(&self, a: &T, b: &T) -> f64;

    /// Maps a distance to a similarity in [0, 100]. Infinite distance is 0.
    fn similarity(&self, distance: f64) -> f64 {
        similarity_from_unit(distance)
    }
}

/// Similarity for distances normalized to [0, 1].
pub fn similarity_from_unit(distance: f64) -> f64 {
    if !distance.is_finite() {
        return 0.0;
    }
    (100.0 * (1.0 - distance)).clamp(0.0, 100.0)
}

/// `|a - b| / max(a, b, 1)`, capped at 1.
pub fn relative_difference(a: f64, b: f64) -> f64 {
    let denom = a.max(b).max(1.0);
    ((a - b).abs() / denom).min(1.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorDistance;

pub fn rgb_distance(a: &Rgb, b: &Rgb) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

impl TokenDistance<ColorToken> for ColorDistance {
    fn distance(&self, a: &ColorToken, b: &ColorToken) -> f64 {
        rgb_distance(&a.rgb, &b.rgb)
    }

    fn similarity(&self, distance: f64) -> f64 {
        if !distance.is_finite() {
            return 0.0;
        }
        (100.0 * (1.0 - distance / MAX_RGB_DISTANCE)).clamp(0.0, 100.0)
    }
}

/// Weighted font size / weight / line-height distance with a family veto.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypographyDistance;

/// Lower-cased first entry of a font stack, without quotes.
pub fn canonical_family(family: &str) -> String {
    family
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_lowercase()
}

impl TokenDistance<TypographyToken> for TypographyDistance {
    fn distance(&self, a: &TypographyToken, b: &TypographyToken) -> f64 {
        if canonical_family(&a.font_family) != canonical_family(&b.font_family) {
            return f64::INFINITY;
        }

        let size = relative_difference(a.font_size_px, b.font_size_px);
        let weight = ((a.font_weight - b.font_weight).abs() / FONT_WEIGHT_RANGE).min(1.0);
        let line_height = match (a.line_height_px(), b.line_height_px()) {
            (None, None) => 0.0,
            (lh_a, lh_b) => {
                let resolve = |lh: Option<f64>, size: f64| lh.unwrap_or(size * NORMAL_LINE_HEIGHT);
                relative_difference(
                    resolve(lh_a, a.font_size_px),
                    resolve(lh_b, b.font_size_px),
                )
            }
        };

        SIZE_WEIGHT * size + WEIGHT_WEIGHT * weight + LINE_HEIGHT_WEIGHT * line_height
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpacingDistance;

impl TokenDistance<SpacingToken> for SpacingDistance {
    fn distance(&self, a: &SpacingToken, b: &SpacingToken) -> f64 {
        relative_difference(a.value_px, b.value_px)
    }
}

/// Name edit distance plus a penalty when element kinds clearly disagree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentDistance;

impl TokenDistance<ComponentToken> for ComponentDistance {
    fn distance(&self, a: &ComponentToken, b: &ComponentToken) -> f64 {
        let name = normalized_edit_distance(&canonical_name(&a.name), &canonical_name(&b.name));
        let kind_a = ElementKind::classify(&a.kind);
        let kind_b = ElementKind::classify(&b.kind);
        let kind = if kind_a.is_specific() && kind_b.is_specific() && kind_a != kind_b {
            1.0
        } else {
            0.0
        };
        NAME_WEIGHT * name + KIND_WEIGHT * kind
    }
}

/// Coarse element classes shared by Figma node types and HTML tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Button,
    Text,
    Image,
    Input,
    Container,
}

impl ElementKind {
    pub fn classify(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "button" => ElementKind::Button,
            "text" | "p" | "span" | "label" | "a" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                ElementKind::Text
            }
            "image" | "img" | "svg" | "picture" | "vector" => ElementKind::Image,
            "input" | "textarea" | "select" => ElementKind::Input,
            _ => ElementKind::Container,
        }
    }

    fn is_specific(&self) -> bool {
        !matches!(self, ElementKind::Container)
    }
}

/// Lower-cases and collapses `-`, `_`, `/`, `.` and whitespace runs to single spaces,
/// so `Button/Primary` and `button-primary` compare equal.
pub fn canonical_name(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | '/' | '.'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Levenshtein distance divided by the longer length; 0 for two empty strings.
pub fn normalized_edit_distance(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    levenshtein(&a, &b) as f64 / longest as f64
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
