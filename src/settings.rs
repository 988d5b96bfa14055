use std::path::Path;
use std::str::FromStr;

use dpm_lib::{Category, Config, DpmError, MatchThresholds};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct CompareFlagSources {
    pub threshold: bool,
    pub pass_threshold: bool,
}

impl CompareFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            threshold: flag_present(args, "--threshold"),
            pass_threshold: flag_present(args, "--pass-threshold"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Merge CLI arguments with config file, preferring CLI when flags are present.
pub fn resolve_compare_settings(
    cli_threshold: f64,
    cli_pass_threshold: f64,
    config: &Config,
    flags: &CompareFlagSources,
) -> Config {
    Config {
        thresholds: if flags.threshold {
            MatchThresholds::uniform(cli_threshold)
        } else {
            config.thresholds
        },
        pass_threshold: if flags.pass_threshold {
            cli_pass_threshold
        } else {
            config.pass_threshold
        },
        ..config.clone()
    }
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/dpm/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, DpmError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        DpmError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    validate_settings(&cfg, path)?;
    Ok(cfg)
}

/// Validate effective settings, naming the config file when there is one.
pub fn validate_settings(config: &Config, path: Option<&Path>) -> Result<(), DpmError> {
    config.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        DpmError::Config(prefix)
    })
}

/// Parse `--categories`; no value means every category.
pub fn parse_categories(raw: Option<&[String]>) -> Result<Vec<Category>, DpmError> {
    let Some(raw) = raw else {
        return Ok(Category::all().to_vec());
    };
    let mut categories = Vec::new();
    for name in raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let category = Category::from_str(name)?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    if categories.is_empty() {
        return Err(DpmError::Config(
            "Unknown category: no categories selected".to_string(),
        ));
    }
    Ok(categories)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(
    config: &Config,
    categories: &[Category],
    config_source: Option<&Path>,
) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let categories = categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "Effective config [{source}]: thresholds: colors={:.1}, typography={:.1}, spacing={:.1}, components={:.1}, pass={:.1}, remBasePx={}, categories={}",
        config.thresholds.colors,
        config.thresholds.typography,
        config.thresholds.spacing,
        config.thresholds.components,
        config.pass_threshold,
        config.rem_base_px,
        categories
    )
}
