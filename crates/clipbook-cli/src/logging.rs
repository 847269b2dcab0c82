//! Global `tracing` subscriber for the CLI.
//!
//! | level   | what                                   |
//! |---------|----------------------------------------|
//! | `error` | fatal command failures                 |
//! | `warn`  | failed checkpoints, degraded rows      |
//! | `info`  | load, save and publish progress        |
//! | `debug` | per-action state transitions           |
//! | `trace` | row text, only with `--log-data`       |

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Crates whose events follow the requested level. Everything else stays at warn.
const WORKSPACE_CRATES: [&str; 5] = [
    "clipbook_cli",
    "clipbook_core",
    "clipbook_ingest",
    "clipbook_model",
    "clipbook_report",
];

static ROW_TEXT_LOGGING: AtomicBool = AtomicBool::new(false);

const HIDDEN_ROW_TEXT: &str = "<hidden>";

/// Row text as it may appear in a log event.
pub fn loggable_row_text(text: &str) -> &str {
    if ROW_TEXT_LOGGING.load(Ordering::Relaxed) {
        text
    } else {
        HIDDEN_ROW_TEXT
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// A set `RUST_LOG` wins over `level`.
    pub honor_rust_log: bool,
    pub format: LogFormat,
    pub ansi: bool,
    /// Append to this file instead of writing to stderr.
    pub file: Option<PathBuf>,
    pub row_text: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            honor_rust_log: true,
            format: LogFormat::Pretty,
            ansi: true,
            file: None,
            row_text: false,
        }
    }
}

impl LogConfig {
    fn filter(&self) -> EnvFilter {
        if self.honor_rust_log
            && let Ok(filter) = EnvFilter::try_from_default_env()
        {
            return filter;
        }
        let level = self.level.to_string().to_lowercase();
        let directives = WORKSPACE_CRATES
            .iter()
            .map(|name| format!("{name}={level}"))
            .fold(String::from("warn"), |acc, directive| acc + "," + &directive);
        EnvFilter::new(directives)
    }

    fn writer(&self) -> io::Result<BoxMakeWriter> {
        Ok(match &self.file {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                BoxMakeWriter::new(Mutex::new(file))
            }
            None => BoxMakeWriter::new(io::stderr),
        })
    }
}

type FilteredRegistry = Layered<EnvFilter, Registry>;

/// Install the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    ROW_TEXT_LOGGING.store(config.row_text, Ordering::Relaxed);
    let writer = config.writer()?;
    // JSON lines keep their timestamps; terminal output drops them.
    let output: Box<dyn Layer<FilteredRegistry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .without_time()
            .with_ansi(config.ansi)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .without_time()
            .with_ansi(config.ansi)
            .with_writer(writer)
            .boxed(),
    };
    tracing_subscriber::registry()
        .with(config.filter())
        .with(output)
        .init();
    Ok(())
}
