//! Column mapping from source headers to logical fields.
//!
//! Resolution order for each field:
//! 1. An explicit override from configuration
//! 2. An exact alias match on the normalized header
//! 3. The best Jaro-Winkler alias match at or above [`FUZZY_MATCH_THRESHOLD`]
//!
//! Status columns are never candidates for a logical field.

use std::collections::BTreeMap;
use std::fmt;

use rapidfuzz::distance::jaro_winkler;
use serde::{Deserialize, Serialize};

use clipbook_model::{BULLETED_COLUMN, PASSED_COLUMN, TOPIC_COLUMN};

use crate::error::SchemaError;

/// Minimum similarity for a fuzzy header match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.9;

/// A column the review workflow reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Url,
    Text,
    /// A cleaned date column, preferred over [`LogicalField::Date`].
    CorrectedDate,
    Date,
    Flags,
    Quote,
}

impl LogicalField {
    /// All fields in resolution order.
    pub const ALL: [LogicalField; 6] = [
        Self::Url,
        Self::Text,
        Self::CorrectedDate,
        Self::Date,
        Self::Flags,
        Self::Quote,
    ];

    /// Normalized header spellings accepted for this field.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Url => &["url", "link", "tweet url", "post url", "permalink"],
            Self::Text => &[
                "text",
                "tweet",
                "tweet text",
                "content",
                "full text",
                "body",
                "message",
            ],
            Self::CorrectedDate => &[
                "date correct format",
                "corrected date",
                "date corrected",
                "correct date",
            ],
            Self::Date => &[
                "date",
                "created at",
                "created",
                "posted at",
                "timestamp",
                "published at",
            ],
            Self::Flags => &["bad words found", "flags", "flagged terms", "bad words"],
            Self::Quote => &["is quote tweet", "quote tweet", "is quote", "quoted"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Text => "text",
            Self::CorrectedDate => "corrected_date",
            Self::Date => "date",
            Self::Flags => "flags",
            Self::Quote => "quote",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit header names per field, usually from configuration.
pub type ColumnOverrides = BTreeMap<LogicalField, String>;

/// How a header was matched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    Override,
    Alias,
    Fuzzy { score: f64 },
}

/// A resolved header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMatch {
    pub index: usize,
    pub header: String,
    #[serde(flatten)]
    pub kind: MatchKind,
}

/// Resolved header positions for every logical field found.
///
/// The URL field is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMapping {
    url: ColumnMatch,
    others: BTreeMap<LogicalField, ColumnMatch>,
}

impl ColumnMapping {
    pub fn url(&self) -> usize {
        self.url.index
    }

    pub fn get(&self, field: LogicalField) -> Option<&ColumnMatch> {
        match field {
            LogicalField::Url => Some(&self.url),
            other => self.others.get(&other),
        }
    }

    pub fn index(&self, field: LogicalField) -> Option<usize> {
        self.get(field).map(|m| m.index)
    }

    /// Every resolved field in resolution order.
    pub fn entries(&self) -> impl Iterator<Item = (LogicalField, &ColumnMatch)> + '_ {
        LogicalField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|m| (field, m)))
    }
}

pub(crate) fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\', '?', ':'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn is_status_header(normalized: &str) -> bool {
    [PASSED_COLUMN, BULLETED_COLUMN, TOPIC_COLUMN]
        .iter()
        .any(|status| normalize_header(status) == normalized)
}

/// Resolve logical fields against `headers`.
pub fn resolve_columns(
    headers: &[String],
    overrides: &ColumnOverrides,
) -> Result<ColumnMapping, SchemaError> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let mut claimed: BTreeMap<usize, LogicalField> = BTreeMap::new();
    let mut resolved: BTreeMap<LogicalField, ColumnMatch> = BTreeMap::new();

    for (&field, header) in overrides {
        let wanted = normalize_header(header);
        let index = normalized
            .iter()
            .position(|n| *n == wanted)
            .ok_or_else(|| SchemaError::UnknownColumn {
                column: header.clone(),
                field,
            })?;
        if let Some(&first) = claimed.get(&index) {
            return Err(SchemaError::DuplicateMapping {
                column: headers[index].clone(),
                first,
                second: field,
            });
        }
        claimed.insert(index, field);
        resolved.insert(
            field,
            ColumnMatch {
                index,
                header: headers[index].clone(),
                kind: MatchKind::Override,
            },
        );
    }

    let available = |index: usize, claimed: &BTreeMap<usize, LogicalField>| {
        !claimed.contains_key(&index)
            && !normalized[index].is_empty()
            && !is_status_header(&normalized[index])
    };

    for field in LogicalField::ALL {
        if resolved.contains_key(&field) {
            continue;
        }
        let exact = (0..headers.len())
            .find(|&i| available(i, &claimed) && field.aliases().contains(&normalized[i].as_str()));
        if let Some(index) = exact {
            claimed.insert(index, field);
            resolved.insert(
                field,
                ColumnMatch {
                    index,
                    header: headers[index].clone(),
                    kind: MatchKind::Alias,
                },
            );
        }
    }

    for field in LogicalField::ALL {
        if resolved.contains_key(&field) {
            continue;
        }
        let mut best: Option<(usize, f64)> = None;
        for index in (0..headers.len()).filter(|&i| available(i, &claimed)) {
            let score = field
                .aliases()
                .iter()
                .map(|alias| jaro_winkler::similarity(normalized[index].chars(), alias.chars()))
                .fold(0.0_f64, f64::max);
            if score >= FUZZY_MATCH_THRESHOLD && best.is_none_or(|(_, s)| score > s) {
                best = Some((index, score));
            }
        }
        if let Some((index, score)) = best {
            tracing::debug!(%field, header = %headers[index], score, "fuzzy column match");
            claimed.insert(index, field);
            resolved.insert(
                field,
                ColumnMatch {
                    index,
                    header: headers[index].clone(),
                    kind: MatchKind::Fuzzy { score },
                },
            );
        }
    }

    let url = resolved
        .remove(&LogicalField::Url)
        .ok_or_else(|| SchemaError::MissingUrlColumn {
            candidates: LogicalField::Url.aliases().join(", "),
        })?;
    Ok(ColumnMapping {
        url,
        others: resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn headers_normalize_case_and_punctuation() {
        assert_eq!(normalize_header("  Tweet_URL "), "tweet url");
        assert_eq!(normalize_header("\u{feff}Date"), "date");
        assert_eq!(normalize_header("bad_words_found"), "bad words found");
    }

    #[test]
    fn aliases_resolve_exactly() {
        let mapping = resolve_columns(
            &headers(&["Tweet", "URL", "Date", "Date Correct Format", "is_quote_tweet"]),
            &ColumnOverrides::new(),
        )
        .unwrap();
        assert_eq!(mapping.url(), 1);
        assert_eq!(mapping.index(LogicalField::Text), Some(0));
        assert_eq!(mapping.index(LogicalField::CorrectedDate), Some(3));
        assert_eq!(mapping.index(LogicalField::Date), Some(2));
        assert_eq!(mapping.index(LogicalField::Quote), Some(4));
        assert_eq!(mapping.index(LogicalField::Flags), None);
    }

    #[test]
    fn near_misses_resolve_fuzzily() {
        let mapping = resolve_columns(&headers(&["URLs", "Texts"]), &ColumnOverrides::new()).unwrap();
        assert_eq!(mapping.url(), 0);
        assert!(matches!(
            mapping.get(LogicalField::Text).map(|m| m.kind),
            Some(MatchKind::Fuzzy { .. })
        ));
    }

    #[test]
    fn status_columns_are_never_candidates() {
        let err = resolve_columns(&headers(&["Topic", "Reviewed Passed"]), &ColumnOverrides::new())
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingUrlColumn { .. }));
    }

    #[test]
    fn override_wins_over_alias() {
        let mut overrides = ColumnOverrides::new();
        overrides.insert(LogicalField::Url, "Source".to_string());
        let mapping = resolve_columns(&headers(&["URL", "Source"]), &overrides).unwrap();
        assert_eq!(mapping.url(), 1);
        assert_eq!(mapping.get(LogicalField::Url).unwrap().kind, MatchKind::Override);
    }

    #[test]
    fn bad_overrides_are_rejected() {
        let mut overrides = ColumnOverrides::new();
        overrides.insert(LogicalField::Url, "Missing".to_string());
        assert!(matches!(
            resolve_columns(&headers(&["URL"]), &overrides),
            Err(SchemaError::UnknownColumn { field: LogicalField::Url, .. })
        ));

        let mut overrides = ColumnOverrides::new();
        overrides.insert(LogicalField::Url, "Link".to_string());
        overrides.insert(LogicalField::Text, "link".to_string());
        assert!(matches!(
            resolve_columns(&headers(&["Link"]), &overrides),
            Err(SchemaError::DuplicateMapping { .. })
        ));
    }
}
