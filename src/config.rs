use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::matcher::DEFAULT_MATCH_THRESHOLD;
use crate::normalize::DEFAULT_REM_BASE_PX;
use crate::types::Category;

const APP_DIR: &str = "dpm";
const APP_CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_PASS_THRESHOLD: f64 = 90.0;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

/// Settings read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub thresholds: MatchThresholds,
    /// Overall similarity needed for `dpm compare` to exit 0
    pub pass_threshold: f64,
    /// Rem base for snapshots that do not declare one
    pub rem_base_px: f64,
    pub cache: CacheConfig,
}

/// Minimum pair similarity (0-100) to commit a match, per category.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchThresholds {
    pub colors: f64,
    pub typography: f64,
    pub spacing: f64,
    pub components: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self::uniform(DEFAULT_MATCH_THRESHOLD)
    }
}

impl MatchThresholds {
    pub fn uniform(threshold: f64) -> Self {
        Self {
            colors: threshold,
            typography: threshold,
            spacing: threshold,
            components: threshold,
        }
    }

    pub fn for_category(&self, category: Category) -> f64 {
        match category {
            Category::Colors => self.colors,
            Category::Typography => self.typography,
            Category::Spacing => self.spacing,
            Category::Components => self.components,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: MatchThresholds::default(),
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            rem_base_px: DEFAULT_REM_BASE_PX,
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Loads `path` when given, else the central config file when it exists,
    /// else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::central_config_path() {
                Some(central) if central.exists() => Self::from_file(&central),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// `$XDG_CONFIG_HOME/dpm/config.toml`, falling back to `~/.config`.
    pub fn central_config_path() -> Option<PathBuf> {
        let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
        let home = std::env::var_os("HOME").map(PathBuf::from);
        central_config_path_with(xdg_config_home.as_deref(), home.as_deref())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::all() {
            let value = self.thresholds.for_category(category);
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field: threshold_field(category),
                    expected: "between 0 and 100",
                    value,
                });
            }
        }
        if !(0.0..=100.0).contains(&self.pass_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "passThreshold",
                expected: "between 0 and 100",
                value: self.pass_threshold,
            });
        }
        if !(self.rem_base_px.is_finite() && self.rem_base_px > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "remBasePx",
                expected: "a positive number",
                value: self.rem_base_px,
            });
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::OutOfRange {
                field: "cache.capacity",
                expected: "at least 1",
                value: 0.0,
            });
        }
        Ok(())
    }
}

fn threshold_field(category: Category) -> &'static str {
    match category {
        Category::Colors => "thresholds.colors",
        Category::Typography => "thresholds.typography",
        Category::Spacing => "thresholds.spacing",
        Category::Components => "thresholds.components",
    }
}

fn central_config_path_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    let root = match xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        Some(xdg) => xdg.to_path_buf(),
        None => home?.join(".config"),
    };
    Some(root.join(APP_DIR).join(APP_CONFIG_FILE))
}
