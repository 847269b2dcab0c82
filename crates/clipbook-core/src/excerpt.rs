//! Excerpt formatting: quoted text and citation dates.

use chrono::{Datelike, NaiveDateTime};

use clipbook_model::{Excerpt, Row};

/// Shown instead of a date when the row has none.
pub const DATE_PLACEHOLDER: &str = "??/??/??";

/// Normalize post text and wrap it in double quotes.
///
/// Inner double quotes become single quotes and line breaks become
/// non-breaking spaces so the excerpt stays one paragraph.
pub fn quote_text(raw: &str) -> String {
    let flattened = raw
        .replace('"', "'")
        .replace("\r\n", "\u{a0}")
        .replace(['\n', '\r'], "\u{a0}");

    let mut collapsed = String::with_capacity(flattened.len());
    let mut previous_space = false;
    for ch in flattened.chars() {
        if ch == ' ' {
            if !previous_space {
                collapsed.push(ch);
            }
            previous_space = true;
        } else {
            collapsed.push(ch);
            previous_space = false;
        }
    }
    format!("\"{}\"", collapsed.trim())
}

/// `M/D/YY` without leading zeros on month and day.
pub fn display_date(date: Option<NaiveDateTime>) -> String {
    match date {
        Some(date) => format!("{}/{}/{:02}", date.month(), date.day(), date.year().rem_euclid(100)),
        None => DATE_PLACEHOLDER.to_string(),
    }
}

pub fn excerpt_for(row: &Row) -> Excerpt {
    if row.date.is_none() {
        tracing::warn!(url = %row.url, "row has no parseable date, using placeholder");
    }
    Excerpt {
        quoted_text: quote_text(&row.text),
        url: row.url.clone(),
        date_display: display_date(row.date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn quotes_and_flattens() {
        assert_eq!(quote_text("He said \"hi\"\nbye"), "\"He said 'hi'\u{a0}bye\"");
        assert_eq!(quote_text("a\r\nb\rc"), "\"a\u{a0}b\u{a0}c\"");
    }

    #[test]
    fn collapses_space_runs_and_trims() {
        assert_eq!(quote_text("  End.   Next  word "), "\"End. Next word\"");
    }

    #[test]
    fn date_display_drops_leading_zeros() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).and_then(|d| d.and_hms_opt(9, 0, 0));
        assert_eq!(display_date(date), "3/5/24");
        let date = NaiveDate::from_ymd_opt(2009, 12, 25).and_then(|d| d.and_hms_opt(0, 0, 0));
        assert_eq!(display_date(date), "12/25/09");
        assert_eq!(display_date(None), DATE_PLACEHOLDER);
    }
}
