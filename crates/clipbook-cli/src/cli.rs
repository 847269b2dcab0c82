//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "clipbook",
    version,
    about = "Review social media posts and file excerpts under topics",
    long_about = "Walk a spreadsheet of posts one row at a time, pass or file each \
                  under a topic, and keep a topic-grouped document of quoted excerpts \
                  in sync with the review."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: ./clipbook.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow post text in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Review rows interactively.
    Review(ReviewArgs),

    /// Show review progress for a source file.
    Status(StatusArgs),

    /// Regenerate the document from the row statuses.
    Rebuild(SourceArgs),

    /// Write a reviewed copy of the rows.
    Export(ExportArgs),

    /// Show how source columns map to review fields.
    Columns(SourceArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// Spreadsheet to review (.csv or .xlsx).
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,
}

#[derive(Args)]
pub struct ReviewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Actions between automatic saves.
    #[arg(long = "save-interval", value_name = "N")]
    pub save_interval: Option<usize>,

    /// Output document path.
    #[arg(long = "document", value_name = "PATH")]
    pub document: Option<PathBuf>,

    /// Account handle used in citations and export names.
    #[arg(long = "handle")]
    pub handle: Option<String>,

    #[command(flatten)]
    pub publish: PublishArgs,
}

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// File name for the copy (default: derived from the review state).
    #[arg(long = "name")]
    pub name: Option<String>,

    /// Account handle used in the derived name.
    #[arg(long = "handle")]
    pub handle: Option<String>,

    #[command(flatten)]
    pub publish: PublishArgs,
}

#[derive(Args)]
pub struct PublishArgs {
    /// Publish copies into this directory.
    #[arg(long = "publish-dir", value_name = "DIR")]
    pub publish_dir: Option<PathBuf>,

    /// Keep older exports of the same review when publishing.
    #[arg(long = "no-prune")]
    pub no_prune: bool,
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
