//! Command-line front end for clipbook reviews.

pub mod config;
pub mod logging;
pub mod open;
pub mod prompt;
pub mod sink;
pub mod status;

pub use config::ClipbookConfig;
pub use open::{OpenedReview, open_review};
pub use prompt::{PromptCommand, PromptExit, TopicChoice, parse_command, run_prompt};
pub use sink::FileSink;
pub use status::{StatusReport, TopicSummary};
