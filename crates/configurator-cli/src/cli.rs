//! CLI argument definitions for the configurator inspection tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "configurator",
    version,
    about = "Building configurator - inspect catalogs and replay selections",
    long_about = "Inspect building configurator catalogs and replay selection scripts.\n\n\
                  Loads the dimension, opening and material catalogs, resolves which\n\
                  options are admissible for a set of drivers, and runs scripted\n\
                  selections through the same cascade the configurator UI uses."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Engine options file (TOML). Defaults apply when omitted.
    #[arg(long = "options", value_name = "TOML", global = true)]
    pub options: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a catalog and report its health.
    Doctor(DoctorArgs),

    /// Show the admissible options for a set of driver values.
    Resolve(ResolveArgs),

    /// Apply a JSON selection script and print the submission record.
    Replay(ReplayArgs),
}

/// Where to load the catalog from.
#[derive(Args)]
pub struct CatalogArgs {
    /// Catalog directory (with catalog.toml, or the default CSV file names).
    #[arg(value_name = "CATALOG_DIR")]
    pub catalog_dir: PathBuf,

    /// Directory tried when the previous ones fail to load. Repeatable.
    #[arg(long = "fallback", value_name = "DIR")]
    pub fallback: Vec<PathBuf>,
}

#[derive(Args)]
pub struct DoctorArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    #[arg(long = "project-type", value_name = "TYPE")]
    pub project_type: Option<String>,

    /// Wall depth in millimetres (200 or 250).
    #[arg(long = "wall-depth", value_name = "MM")]
    pub wall_depth: Option<String>,

    #[arg(long = "height", value_name = "VALUE")]
    pub height: Option<String>,

    #[arg(long = "width", value_name = "VALUE")]
    pub width: Option<String>,

    #[arg(long = "length", value_name = "VALUE")]
    pub length: Option<String>,

    /// mono-pitch or double-pitch.
    #[arg(long = "roof-type", value_name = "ROOF")]
    pub roof_type: Option<String>,

    /// Print the admissible sets as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// JSON list of selection steps.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Start from a saved selection record.
    #[arg(long = "restore", value_name = "PATH")]
    pub restore: Option<PathBuf>,

    /// Save the final selection record here.
    #[arg(long = "save", value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Report rejected steps and continue instead of stopping at the first one.
    #[arg(long = "keep-going")]
    pub keep_going: bool,

    /// Print form fields instead of the JSON submission record.
    #[arg(long = "form")]
    pub form: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
