//! Output document model.
//!
//! The document is always rebuilt in full from the [`TopicContentIndex`];
//! [`render_document`] is pure, so rendering an unchanged index twice
//! yields identical models.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use clipbook_model::Excerpt;

use crate::topics::TopicContentIndex;

/// Platform and account named in every citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationStyle {
    pub platform: String,
    pub handle: String,
}

impl Default for CitationStyle {
    fn default() -> Self {
        Self {
            platform: "X".to_string(),
            handle: "@handle".to_string(),
        }
    }
}

impl CitationStyle {
    /// Text before the linked date, e.g. `[X, @handle, `.
    pub fn prefix(&self) -> String {
        format!("[{}, {}, ", self.platform, self.handle)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Run {
    Text { text: String },
    Link { text: String, url: String },
}

impl Run {
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } | Self::Link { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        text: String,
    },
    /// A paragraph with no runs is a blank spacer line.
    Paragraph {
        alignment: Alignment,
        runs: Vec<Run>,
    },
}

impl Block {
    fn spacer() -> Self {
        Self::Paragraph {
            alignment: Alignment::Left,
            runs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentModel {
    blocks: Vec<Block>,
}

impl DocumentModel {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Terminal preview: headings as `## TOPIC`, centered paragraphs
    /// indented, links shown as their text.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Heading { text } => {
                    let _ = writeln!(out, "## {text}");
                }
                Block::Paragraph { alignment, runs } => {
                    let line: String = runs.iter().map(Run::text).collect();
                    if *alignment == Alignment::Center && !line.is_empty() {
                        out.push_str("        ");
                    }
                    let _ = writeln!(out, "{line}");
                }
            }
        }
        out
    }
}

fn citation_runs(excerpt: &Excerpt, style: &CitationStyle) -> [Run; 3] {
    [
        Run::Text {
            text: style.prefix(),
        },
        Run::Link {
            text: excerpt.date_display.clone(),
            url: excerpt.url.clone(),
        },
        Run::Text {
            text: "]".to_string(),
        },
    ]
}

/// Render every topic in lexicographic order.
///
/// Each excerpt yields the quoted text with an inline citation, a spacer,
/// the citation again centered on its own line, and another spacer.
pub fn render_document(index: &TopicContentIndex, style: &CitationStyle) -> DocumentModel {
    let mut blocks = Vec::with_capacity(1 + index.excerpt_count() * 4);
    for (topic, excerpts) in index.iter() {
        blocks.push(Block::Heading {
            text: topic.to_string(),
        });
        for excerpt in excerpts {
            let mut runs = vec![Run::Text {
                text: format!("{} ", excerpt.quoted_text),
            }];
            runs.extend(citation_runs(excerpt, style));
            blocks.push(Block::Paragraph {
                alignment: Alignment::Left,
                runs,
            });
            blocks.push(Block::spacer());
            blocks.push(Block::Paragraph {
                alignment: Alignment::Center,
                runs: citation_runs(excerpt, style).into(),
            });
            blocks.push(Block::spacer());
        }
    }
    DocumentModel { blocks }
}
