use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dpm")]
#[command(
    version,
    about = "Design Parity Matcher - Match design tokens and components against an implementation",
    long_about = "Design Parity Matcher (DPM)\n\nModes:\n- compare: match the colors, typography, spacing and components of a design snapshot against an implementation snapshot and score their parity.\n- normalize: print the normalized tokens of a single snapshot.\n\nSnapshots are flat JSON or YAML files produced by the extraction step.\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults for thresholds/rem base/cache; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a design snapshot against an implementation snapshot
    Compare {
        #[arg(long, value_name = "FILE", help = "Design snapshot (.json, .yaml or .yml)")]
        design: PathBuf,

        #[arg(
            long,
            value_name = "FILE",
            help = "Implementation snapshot; a missing file is compared as empty"
        )]
        r#impl: PathBuf,

        #[arg(
            long,
            default_value = "70",
            help = "Minimum pair similarity (0-100) to match tokens, for every category"
        )]
        threshold: f64,

        #[arg(
            long,
            default_value = "90",
            help = "Overall similarity (0-100) needed to pass (similarity >= threshold passes)"
        )]
        pass_threshold: f64,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Categories to compare (colors,typography,spacing,components)"
        )]
        categories: Option<Vec<String>>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,

        #[arg(
            long,
            help = "Skip matching and emit the normalized tokens of both snapshots"
        )]
        skip_compare: bool,
    },

    /// Print the normalized tokens of one snapshot
    Normalize {
        #[arg(long, value_name = "FILE", help = "Snapshot to normalize (.json, .yaml or .yml)")]
        input: PathBuf,

        #[arg(
            long,
            value_name = "PX",
            help = "Rem base in px when the snapshot does not declare one"
        )]
        rem_base: Option<f64>,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
