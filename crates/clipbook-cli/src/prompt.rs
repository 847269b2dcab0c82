//! Interactive review prompt.
//!
//! Commands:
//!
//! | input              | effect                                   |
//! |--------------------|------------------------------------------|
//! | `p`, `pass`        | mark the row reviewed without output     |
//! | `b <topic>`        | file the row under a topic               |
//! | `b #<n>`           | file under the n-th known topic          |
//! | `u`, `undo`        | revert the last pass or bullet           |
//! | `t`, `topics`      | list known topics                        |
//! | `s`, `save`        | checkpoint now                           |
//! | `e`, `export [n]`  | write a reviewed copy                    |
//! | `rebuild`          | regenerate the document from statuses    |
//! | `reset`            | clear every status (asks to confirm)     |
//! | `h`, `help`, `?`   | show this list                           |
//! | `q`, `quit`        | save pending work and leave              |

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::trace;

use clipbook_core::{CheckpointOutcome, CheckpointSink, Reviewer, display_date};

use crate::logging::loggable_row_text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicChoice {
    Named(String),
    /// 1-based position in the sorted vocabulary.
    Numbered(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    Pass,
    Bullet(TopicChoice),
    Undo,
    Topics,
    Save,
    Export(Option<String>),
    Rebuild,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("bullet needs a topic, e.g. 'b Economy' or 'b #2'")]
    MissingTopic,

    #[error("'{0}' is not a topic number")]
    BadTopicNumber(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<PromptCommand>, PromptError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word.to_lowercase().as_str() {
        "p" | "pass" => PromptCommand::Pass,
        "b" | "bullet" => PromptCommand::Bullet(parse_topic(rest)?),
        "u" | "undo" | "back" => PromptCommand::Undo,
        "t" | "topics" => PromptCommand::Topics,
        "s" | "save" => PromptCommand::Save,
        "e" | "export" => PromptCommand::Export((!rest.is_empty()).then(|| rest.to_string())),
        "rebuild" => PromptCommand::Rebuild,
        "reset" => PromptCommand::Reset,
        "h" | "help" | "?" => PromptCommand::Help,
        "q" | "quit" | "exit" => PromptCommand::Quit,
        _ => return Err(PromptError::Unknown(word.to_string())),
    };
    Ok(Some(command))
}

fn parse_topic(raw: &str) -> Result<TopicChoice, PromptError> {
    if raw.is_empty() {
        return Err(PromptError::MissingTopic);
    }
    match raw.strip_prefix('#') {
        Some(number) => number
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(TopicChoice::Numbered)
            .ok_or_else(|| PromptError::BadTopicNumber(number.to_string())),
        None => Ok(TopicChoice::Named(raw.to_string())),
    }
}

const HELP: &str = "\
  p              pass (reviewed, no output)
  b <topic>      bullet under a topic
  b #<n>         bullet under topic number n
  u              undo the last action
  t              list topics
  s              save now
  e [name]       export a reviewed copy
  rebuild        regenerate the document from row statuses
  reset          clear every status and start over
  q              save and quit";

/// How the prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptExit {
    /// Quit with nothing left to save, or the final save succeeded.
    Clean,
    /// The final save failed; the message describes why.
    SaveFailed(String),
}

/// Run the prompt until `quit` or end of input, then save pending work.
pub fn run_prompt<S, R, W>(
    reviewer: &mut Reviewer<S>,
    mut input: R,
    mut out: W,
) -> io::Result<PromptExit>
where
    S: CheckpointSink,
    R: BufRead,
    W: Write,
{
    show_current(reviewer, &mut out)?;
    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                writeln!(out, "{error}")?;
                continue;
            }
        };
        match command {
            PromptCommand::Quit => break,
            PromptCommand::Reset => {
                write!(out, "Clear every status and start over? Type 'yes' to confirm: ")?;
                out.flush()?;
                line.clear();
                input.read_line(&mut line)?;
                if line.trim().eq_ignore_ascii_case("yes") {
                    let outcome = reviewer.reset_for_rereview();
                    writeln!(out, "Reset. {}", describe_checkpoint(&outcome))?;
                    show_current(reviewer, &mut out)?;
                } else {
                    writeln!(out, "Reset cancelled.")?;
                }
            }
            command => apply(reviewer, command, &mut out)?,
        }
    }

    // Untouched sessions leave the source file alone.
    if reviewer.session().history().is_empty() && reviewer.last_checkpoint().is_none() {
        return Ok(PromptExit::Clean);
    }
    let outcome = reviewer.save_now();
    writeln!(out, "{}", describe_checkpoint(&outcome))?;
    Ok(match outcome {
        CheckpointOutcome::Saved { .. } => PromptExit::Clean,
        CheckpointOutcome::Failed { error, .. } => PromptExit::SaveFailed(error.to_string()),
    })
}

fn apply<S: CheckpointSink, W: Write>(
    reviewer: &mut Reviewer<S>,
    command: PromptCommand,
    out: &mut W,
) -> io::Result<()> {
    match command {
        PromptCommand::Pass => match reviewer.pass() {
            Ok(report) => {
                if let Some(outcome) = &report.checkpoint {
                    writeln!(out, "{}", describe_checkpoint(outcome))?;
                }
                show_current(reviewer, out)?;
            }
            Err(error) => writeln!(out, "{error}")?,
        },
        PromptCommand::Bullet(choice) => {
            let topic = match choice {
                TopicChoice::Named(name) => name,
                TopicChoice::Numbered(n) => match reviewer.session().vocabulary().nth(n) {
                    Some(topic) => topic.to_string(),
                    None => {
                        writeln!(out, "no topic #{n} (type 't' to list topics)")?;
                        return Ok(());
                    }
                },
            };
            match reviewer.bullet(&topic) {
                Ok(report) => {
                    if let Some(outcome) = &report.checkpoint {
                        writeln!(out, "{}", describe_checkpoint(outcome))?;
                    }
                    show_current(reviewer, out)?;
                }
                Err(error) => writeln!(out, "{error}")?,
            }
        }
        PromptCommand::Undo => match reviewer.undo() {
            Ok(entry) => {
                writeln!(out, "Undid row {}.", entry.row_index + 1)?;
                show_current(reviewer, out)?;
            }
            Err(error) => writeln!(out, "{error}")?,
        },
        PromptCommand::Topics => {
            let vocabulary = reviewer.session().vocabulary();
            if vocabulary.is_empty() {
                writeln!(out, "No topics yet.")?;
            }
            let index = reviewer.session().topic_index();
            for (position, topic) in vocabulary.iter().enumerate() {
                let count = index.get(topic).map_or(0, <[_]>::len);
                writeln!(out, "  #{:<3} {topic} ({count})", position + 1)?;
            }
        }
        PromptCommand::Save => {
            let outcome = reviewer.save_now();
            writeln!(out, "{}", describe_checkpoint(&outcome))?;
        }
        PromptCommand::Export(name) => match reviewer.export_copy(name.as_deref()) {
            Ok(location) => writeln!(out, "Exported to {location}")?,
            Err(error) => writeln!(out, "Export failed: {error}. {}", error.suggestion())?,
        },
        PromptCommand::Rebuild => {
            reviewer.rebuild_from_source();
            let index = reviewer.session().topic_index();
            writeln!(
                out,
                "Rebuilt document: {} topics, {} excerpts.",
                index.topic_count(),
                index.excerpt_count()
            )?;
        }
        PromptCommand::Help => writeln!(out, "{HELP}")?,
        PromptCommand::Reset | PromptCommand::Quit => {}
    }
    Ok(())
}

/// One line describing a checkpoint result.
pub fn describe_checkpoint(outcome: &CheckpointOutcome) -> String {
    match outcome {
        CheckpointOutcome::Saved { at, .. } => format!("Saved at {}.", at.format("%H:%M:%S")),
        CheckpointOutcome::Failed { error, .. } => {
            format!("Save failed: {error}. {}", error.suggestion())
        }
    }
}

fn show_current<S: CheckpointSink, W: Write>(reviewer: &Reviewer<S>, out: &mut W) -> io::Result<()> {
    let session = reviewer.session();
    let counters = session.counters();
    let Some((index, row)) = session.current() else {
        return writeln!(
            out,
            "All {} rows reviewed ({} passed, {} bulleted). Type 'q' to save and quit.",
            session.rows().len(),
            counters.pass_count,
            counters.bullet_count
        );
    };
    trace!(row = index, text = loggable_row_text(&row.text), "showing row");
    writeln!(out)?;
    writeln!(
        out,
        "[{}/{}] {}  {}",
        index + 1,
        session.rows().len(),
        display_date(row.date),
        row.url
    )?;
    if row.is_quote {
        writeln!(out, "(quote)")?;
    }
    if let Some(flags) = row.flags.as_deref().filter(|f| !f.trim().is_empty()) {
        writeln!(out, "flags: {flags}")?;
    }
    writeln!(out, "{}", row.text.trim())
}
