//! Normalized token types.
//!
//! Every raw style value pulled from a snapshot ends up as exactly one
//! [`Token`]. Malformed values become [`Token::Invalid`] so downstream code
//! never inspects raw shapes at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DpmError;

/// Provenance of a token set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Extracted from the Figma document
    Design,
    /// Scraped from the rendered web page
    Implementation,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Design => "design",
            Side::Implementation => "implementation",
        })
    }
}

/// The kind of token set being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Colors,
    Typography,
    Spacing,
    Components,
}

impl Category {
    pub const fn all() -> [Category; 4] {
        [
            Category::Colors,
            Category::Typography,
            Category::Spacing,
            Category::Components,
        ]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Colors => "colors",
            Category::Typography => "typography",
            Category::Spacing => "spacing",
            Category::Components => "components",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "colors" | "color" => Ok(Category::Colors),
            "typography" | "fonts" => Ok(Category::Typography),
            "spacing" => Ok(Category::Spacing),
            "components" | "component" => Ok(Category::Components),
            _ => Err(DpmError::Config(format!("Unknown category: {}", s))),
        }
    }
}

/// An opaque sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Line height as found in style data.
///
/// Unitless values stay multipliers until a comparator knows which font size
/// they apply to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum LineHeight {
    Px(f64),
    Multiplier(f64),
}

impl LineHeight {
    pub fn resolve(&self, font_size_px: f64) -> f64 {
        match *self {
            LineHeight::Px(px) => px,
            LineHeight::Multiplier(m) => m * font_size_px,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorToken {
    pub rgb: Rgb,
    pub raw: String,
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyToken {
    pub font_family: String,
    pub font_size_px: f64,
    pub font_weight: f64,
    pub line_height: Option<LineHeight>,
    pub frequency: u32,
}

impl TypographyToken {
    /// Line height in pixels, if one was specified.
    pub fn line_height_px(&self) -> Option<f64> {
        self.line_height.map(|lh| lh.resolve(self.font_size_px))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingToken {
    pub value_px: f64,
    pub raw: String,
    pub frequency: u32,
}

/// A named structural element: a Figma component or a DOM element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentToken {
    pub name: String,
    pub kind: String,
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidToken {
    pub category: Category,
    pub raw: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Token {
    Color(ColorToken),
    Typography(TypographyToken),
    Spacing(SpacingToken),
    Component(ComponentToken),
    Invalid(InvalidToken),
}

impl Token {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Token::Invalid(_))
    }

    /// Occurrences folded into this token; invalid entries count as 0.
    pub fn frequency(&self) -> u32 {
        match self {
            Token::Color(t) => t.frequency,
            Token::Typography(t) => t.frequency,
            Token::Spacing(t) => t.frequency,
            Token::Component(t) => t.frequency,
            Token::Invalid(_) => 0,
        }
    }
}

impl From<ColorToken> for Token {
    fn from(t: ColorToken) -> Self {
        Token::Color(t)
    }
}

impl From<TypographyToken> for Token {
    fn from(t: TypographyToken) -> Self {
        Token::Typography(t)
    }
}

impl From<SpacingToken> for Token {
    fn from(t: SpacingToken) -> Self {
        Token::Spacing(t)
    }
}

impl From<ComponentToken> for Token {
    fn from(t: ComponentToken) -> Self {
        Token::Component(t)
    }
}

impl From<InvalidToken> for Token {
    fn from(t: InvalidToken) -> Self {
        Token::Invalid(t)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Color(c) => write!(f, "{}", c.rgb.to_hex()),
            Token::Typography(t) => {
                write!(
                    f,
                    "{} {}px/{}",
                    t.font_family,
                    format_number(t.font_size_px),
                    format_number(t.font_weight)
                )?;
                if let Some(lh) = t.line_height_px() {
                    write!(f, " lh {}px", format_number(lh))?;
                }
                Ok(())
            }
            Token::Spacing(s) => write!(f, "{}px", format_number(s.value_px)),
            Token::Component(c) if c.kind.is_empty() => write!(f, "{}", c.name),
            Token::Component(c) => write!(f, "{} ({})", c.name, c.kind),
            Token::Invalid(i) => write!(f, "invalid {} value '{}'", i.category, i.raw),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
