use serde::{Deserialize, Serialize};

/// One quoted, cited entry of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Excerpt {
    /// Normalized post text wrapped in double quotes.
    pub quoted_text: String,
    /// Hyperlink target of the citation date.
    pub url: String,
    /// `M/D/YY`, or a placeholder when the date did not parse.
    pub date_display: String,
}
