//! Cell value parsing: dates and boolean-ish flags.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
];

/// Formats carrying an explicit offset, e.g. `Tue Mar 05 14:00:00 +0000 2024`.
const OFFSET_FORMATS: &[&str] = &["%a %b %d %H:%M:%S %z %Y", "%Y-%m-%d %H:%M:%S %z"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Largest serial a spreadsheet can represent (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

/// Parse a date cell in any of the common export encodings.
///
/// Offsets are dropped after conversion to the writer's local time, so
/// `2024-03-05T23:00:00-05:00` reads as 2024-03-05 23:00.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() || is_missing_marker(value) {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Some(parsed.naive_local());
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format)
            && plausible_year(parsed.year())
        {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format)
            && plausible_year(parsed.year())
        {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        let year = value[..4].parse().ok()?;
        let month = value[4..6].parse().ok()?;
        let day = value[6..].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0);
    }
    value.parse::<f64>().ok().and_then(from_spreadsheet_serial)
}

fn is_missing_marker(value: &str) -> bool {
    ["nan", "nat", "none", "null", "n/a"]
        .iter()
        .any(|marker| value.eq_ignore_ascii_case(marker))
}

fn plausible_year(year: i32) -> bool {
    (1000..=9999).contains(&year)
}

/// Convert a spreadsheet day serial (epoch 1899-12-30) to a timestamp.
fn from_spreadsheet_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(1.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = TimeDelta::try_days(serial.trunc() as i64)?;
    let seconds = TimeDelta::try_seconds((serial.fract() * 86_400.0).round() as i64)?;
    epoch.checked_add_signed(days)?.checked_add_signed(seconds)
}

/// Interpret a boolean-ish cell. Anything unrecognized is `false`.
pub fn parse_flag(raw: &str) -> bool {
    let value = raw.trim();
    ["true", "yes", "y", "t", "x"]
        .iter()
        .any(|truthy| value.eq_ignore_ascii_case(truthy))
        || value
            .parse::<f64>()
            .is_ok_and(|n| n.is_finite() && n != 0.0)
}
