//! Token normalization.
//!
//! Converts the raw strings and numbers found in extracted style data into
//! comparable [`Token`]s. Normalization never fails: anything that cannot be
//! parsed becomes [`Token::Invalid`] carrying the reason.

use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::types::{
    Category, ColorToken, ComponentToken, InvalidToken, LineHeight, RawComponent, RawTypography,
    RawValue, Rgb, Snapshot, SpacingToken, Token, TypographyToken,
};

pub const DEFAULT_REM_BASE_PX: f64 = 16.0;
pub const DEFAULT_FONT_WEIGHT: f64 = 400.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("empty value")]
    Empty,
    #[error("unrecognized color format")]
    UnknownColorFormat,
    #[error("invalid hex color '#{0}'")]
    InvalidHex(String),
    #[error("expected 3 or 4 color channels, found {0}")]
    ChannelCount(usize),
    #[error("invalid color channel '{0}'")]
    InvalidChannel(String),
    #[error("transparent has no opaque color")]
    Transparent,
    #[error("invalid length '{0}'")]
    InvalidLength(String),
    #[error("unsupported unit in '{0}'")]
    UnsupportedUnit(String),
    #[error("negative length '{0}'")]
    Negative(String),
    #[error("missing font family")]
    MissingFontFamily,
    #[error("missing font size")]
    MissingFontSize,
    #[error("invalid font weight '{0}'")]
    InvalidFontWeight(String),
    #[error("missing component name")]
    MissingName,
    #[error("{0} entry does not belong to the {1} category")]
    ShapeMismatch(&'static str, Category),
}

/// A raw entry borrowed from a [`Snapshot`].
#[derive(Debug, Clone, Copy)]
pub enum RawToken<'a> {
    Value(&'a RawValue),
    Typography(&'a RawTypography),
    Component(&'a RawComponent),
}

impl RawToken<'_> {
    fn shape(&self) -> &'static str {
        match self {
            RawToken::Value(_) => "value",
            RawToken::Typography(_) => "typography",
            RawToken::Component(_) => "component",
        }
    }

    fn describe(&self) -> String {
        match self {
            RawToken::Value(v) => v.to_string(),
            RawToken::Typography(t) => {
                let part = |v: &Option<RawValue>| {
                    v.as_ref()
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "-".to_string())
                };
                format!(
                    "{} {} {} {}",
                    t.font_family.as_deref().unwrap_or("-"),
                    part(&t.font_size),
                    part(&t.font_weight),
                    part(&t.line_height)
                )
            }
            RawToken::Component(c) => c.name.clone(),
        }
    }
}

/// All tokens of one snapshot after normalization, including invalid ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTokens {
    pub colors: Vec<Token>,
    pub typography: Vec<Token>,
    pub spacing: Vec<Token>,
    pub components: Vec<Token>,
}

impl NormalizedTokens {
    pub fn invalid_count(&self) -> usize {
        [
            &self.colors,
            &self.typography,
            &self.spacing,
            &self.components,
        ]
        .iter()
        .flat_map(|tokens| tokens.iter())
        .filter(|t| t.is_invalid())
        .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    pub rem_base_px: f64,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            rem_base_px: DEFAULT_REM_BASE_PX,
        }
    }
}

impl Normalizer {
    pub fn new(rem_base_px: f64) -> Self {
        Self { rem_base_px }
    }

    /// Uses the snapshot's own rem base when it declares a usable one.
    pub fn for_snapshot(snapshot: &Snapshot, fallback_rem_base_px: f64) -> Self {
        let rem_base_px = snapshot
            .rem_base_px
            .filter(|base| base.is_finite() && *base > 0.0)
            .unwrap_or(fallback_rem_base_px);
        Self { rem_base_px }
    }

    pub fn normalize(&self, raw: RawToken<'_>, category: Category) -> Token {
        let normalized = match (raw, category) {
            (RawToken::Value(v), Category::Colors) => color_token(v).map(Token::from),
            (RawToken::Value(v), Category::Spacing) => self.spacing_token(v).map(Token::from),
            (RawToken::Typography(t), Category::Typography) => {
                self.typography_token(t).map(Token::from)
            }
            (RawToken::Component(c), Category::Components) => component_token(c).map(Token::from),
            (raw, category) => Err(NormalizeError::ShapeMismatch(raw.shape(), category)),
        };

        normalized.unwrap_or_else(|err| {
            Token::Invalid(InvalidToken {
                category,
                raw: raw.describe(),
                reason: err.to_string(),
            })
        })
    }

    pub fn normalize_snapshot(&self, snapshot: &Snapshot) -> NormalizedTokens {
        NormalizedTokens {
            colors: snapshot
                .colors
                .iter()
                .map(|v| self.normalize(RawToken::Value(v), Category::Colors))
                .collect(),
            typography: snapshot
                .typography
                .iter()
                .map(|t| self.normalize(RawToken::Typography(t), Category::Typography))
                .collect(),
            spacing: snapshot
                .spacing
                .iter()
                .map(|v| self.normalize(RawToken::Value(v), Category::Spacing))
                .collect(),
            components: snapshot
                .components
                .iter()
                .map(|c| self.normalize(RawToken::Component(c), Category::Components))
                .collect(),
        }
    }

    fn spacing_token(&self, value: &RawValue) -> Result<SpacingToken, NormalizeError> {
        let px = self.length_px(value)?;
        if px < 0.0 {
            return Err(NormalizeError::Negative(value.to_string()));
        }
        Ok(SpacingToken {
            value_px: px,
            raw: value.to_string(),
            frequency: 1,
        })
    }

    fn typography_token(&self, raw: &RawTypography) -> Result<TypographyToken, NormalizeError> {
        let font_family = raw
            .font_family
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .ok_or(NormalizeError::MissingFontFamily)?;

        let size_value = raw
            .font_size
            .as_ref()
            .ok_or(NormalizeError::MissingFontSize)?;
        let font_size_px = self.length_px(size_value)?;
        if font_size_px <= 0.0 {
            return Err(NormalizeError::InvalidLength(size_value.to_string()));
        }

        let font_weight = match &raw.font_weight {
            None => DEFAULT_FONT_WEIGHT,
            Some(value) => parse_font_weight(value)?,
        };

        let line_height = match (&raw.line_height_px, &raw.line_height) {
            (Some(px), _) => Some(self.line_height_px(px)?),
            (None, Some(value)) => self.line_height(value)?,
            (None, None) => None,
        };

        Ok(TypographyToken {
            font_family: font_family.to_string(),
            font_size_px,
            font_weight,
            line_height,
            frequency: 1,
        })
    }

    fn line_height(&self, value: &RawValue) -> Result<Option<LineHeight>, NormalizeError> {
        let line_height = match value {
            RawValue::Number(n) => LineHeight::Multiplier(*n),
            RawValue::Text(text) => {
                let trimmed = text.trim().to_ascii_lowercase();
                if trimmed == "normal" {
                    return Ok(None);
                }
                if let Some(pct) = trimmed.strip_suffix('%') {
                    LineHeight::Multiplier(parse_number(pct.trim(), text)? / 100.0)
                } else if trimmed.ends_with(|c: char| c.is_ascii_alphabetic()) {
                    LineHeight::Px(parse_length(&trimmed, self.rem_base_px)?)
                } else {
                    LineHeight::Multiplier(parse_number(&trimmed, text)?)
                }
            }
        };

        let magnitude = match line_height {
            LineHeight::Px(v) | LineHeight::Multiplier(v) => v,
        };
        if !magnitude.is_finite() {
            return Err(NormalizeError::InvalidLength(value.to_string()));
        }
        if magnitude < 0.0 {
            return Err(NormalizeError::Negative(value.to_string()));
        }
        Ok(Some(line_height))
    }

    fn line_height_px(&self, value: &RawValue) -> Result<LineHeight, NormalizeError> {
        let px = self.length_px(value)?;
        if px < 0.0 {
            return Err(NormalizeError::Negative(value.to_string()));
        }
        Ok(LineHeight::Px(px))
    }

    fn length_px(&self, value: &RawValue) -> Result<f64, NormalizeError> {
        match value {
            RawValue::Number(n) if n.is_finite() => Ok(*n),
            RawValue::Number(n) => Err(NormalizeError::InvalidLength(n.to_string())),
            RawValue::Text(text) => parse_length(text, self.rem_base_px),
        }
    }
}

fn color_token(value: &RawValue) -> Result<ColorToken, NormalizeError> {
    let RawValue::Text(text) = value else {
        return Err(NormalizeError::UnknownColorFormat);
    };
    Ok(ColorToken {
        rgb: parse_color(text)?,
        raw: text.trim().to_string(),
        frequency: 1,
    })
}

fn component_token(raw: &RawComponent) -> Result<ComponentToken, NormalizeError> {
    let name = raw.name.trim();
    if name.is_empty() {
        return Err(NormalizeError::MissingName);
    }
    Ok(ComponentToken {
        name: name.to_string(),
        kind: raw
            .kind
            .as_deref()
            .map(|k| k.trim().to_lowercase())
            .unwrap_or_default(),
        frequency: 1,
    })
}

/// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(...)` and `rgba(...)`.
///
/// Alpha is validated but discarded.
pub fn parse_color(input: &str) -> Result<Rgb, NormalizeError> {
    let value = input.trim().to_ascii_lowercase();
    if value.is_empty() {
        return Err(NormalizeError::Empty);
    }
    if value == "transparent" {
        return Err(NormalizeError::Transparent);
    }
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = functional_args(&value, "rgba").or_else(|| functional_args(&value, "rgb"))
    {
        return parse_rgb_args(args);
    }
    Err(NormalizeError::UnknownColorFormat)
}

fn functional_args<'a>(value: &'a str, name: &str) -> Option<&'a str> {
    value
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_hex(hex: &str) -> Result<Rgb, NormalizeError> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(NormalizeError::InvalidHex(hex.to_string()));
    }
    let opaque = match hex.len() {
        3 | 6 => hex,
        4 => &hex[..3],
        8 => &hex[..6],
        _ => return Err(NormalizeError::InvalidHex(hex.to_string())),
    };
    let color = Srgb::<u8>::from_str(opaque)
        .map_err(|_| NormalizeError::InvalidHex(hex.to_string()))?;
    Ok(Rgb::new(color.red, color.green, color.blue))
}

fn parse_rgb_args(args: &str) -> Result<Rgb, NormalizeError> {
    let parts: Vec<&str> = if args.contains(',') {
        args.split(',').map(str::trim).collect()
    } else {
        // CSS Color 4 space-separated syntax: rgb(255 0 0 / 50%)
        args.split(|c: char| c.is_whitespace() || c == '/')
            .filter(|s| !s.is_empty())
            .collect()
    };

    if parts.len() != 3 && parts.len() != 4 {
        return Err(NormalizeError::ChannelCount(parts.len()));
    }

    let r = parse_channel(parts[0])?;
    let g = parse_channel(parts[1])?;
    let b = parse_channel(parts[2])?;
    if let Some(alpha) = parts.get(3) {
        let numeric = alpha.strip_suffix('%').unwrap_or(alpha);
        parse_number(numeric, alpha).map_err(|_| NormalizeError::InvalidChannel(alpha.to_string()))?;
    }
    Ok(Rgb::new(r, g, b))
}

fn parse_channel(part: &str) -> Result<u8, NormalizeError> {
    let invalid = || NormalizeError::InvalidChannel(part.to_string());
    let value = match part.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().map_err(|_| invalid())? / 100.0 * 255.0,
        None => part.parse::<f64>().map_err(|_| invalid())?,
    };
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value.clamp(0.0, 255.0).round() as u8)
}

/// Converts a CSS length (`12px`, `0.75rem`, `1em`, `9pt`, `8`) to pixels.
pub fn parse_length(input: &str, rem_base_px: f64) -> Result<f64, NormalizeError> {
    let value = input.trim().to_ascii_lowercase();
    if value.is_empty() {
        return Err(NormalizeError::Empty);
    }

    let (number, unit) = if let Some(n) = value.strip_suffix("rem") {
        (n, LengthUnit::Rem)
    } else if let Some(n) = value.strip_suffix("em") {
        (n, LengthUnit::Rem)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, LengthUnit::Px)
    } else if let Some(n) = value.strip_suffix("pt") {
        (n, LengthUnit::Pt)
    } else {
        (value.as_str(), LengthUnit::Px)
    };

    let number = number.trim();
    if number.ends_with(|c: char| c.is_ascii_alphabetic() || c == '%') {
        return Err(NormalizeError::UnsupportedUnit(input.to_string()));
    }
    let n = parse_number(number, input)?;
    Ok(match unit {
        LengthUnit::Px => n,
        LengthUnit::Rem => n * rem_base_px,
        LengthUnit::Pt => n * 4.0 / 3.0,
    })
}

#[derive(Debug, Clone, Copy)]
enum LengthUnit {
    Px,
    Rem,
    Pt,
}

fn parse_number(number: &str, original: &str) -> Result<f64, NormalizeError> {
    number
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| NormalizeError::InvalidLength(original.to_string()))
}

fn parse_font_weight(value: &RawValue) -> Result<f64, NormalizeError> {
    let weight = match value {
        RawValue::Number(n) => Some(*n),
        RawValue::Text(text) => {
            let lower = text.trim().to_ascii_lowercase().replace(['-', ' '], "");
            match lower.parse::<f64>() {
                Ok(n) => Some(n),
                Err(_) => font_weight_keyword(&lower),
            }
        }
    };

    weight
        .filter(|w| w.is_finite() && (1.0..=1000.0).contains(w))
        .ok_or_else(|| NormalizeError::InvalidFontWeight(value.to_string()))
}

fn font_weight_keyword(keyword: &str) -> Option<f64> {
    match keyword {
        "thin" | "hairline" => Some(100.0),
        "extralight" | "ultralight" => Some(200.0),
        "light" => Some(300.0),
        "normal" | "regular" | "book" => Some(400.0),
        "medium" => Some(500.0),
        "semibold" | "demibold" => Some(600.0),
        "bold" => Some(700.0),
        "extrabold" | "ultrabold" => Some(800.0),
        "black" | "heavy" => Some(900.0),
        _ => None,
    }
}
