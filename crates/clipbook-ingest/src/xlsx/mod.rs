//! Minimal XLSX (Office Open XML spreadsheet) support.
//!
//! Only the first worksheet is read. Written workbooks hold a single sheet
//! of inline strings, booleans, and numbers.

mod reader;
mod writer;

pub(crate) use reader::parse_xlsx;
pub(crate) use writer::encode_xlsx;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    #[error("malformed XML in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("missing workbook part: {0}")]
    MissingPart(String),
}

pub(crate) fn xml_error<E: std::fmt::Display>(part: &str) -> impl Fn(E) -> XlsxError + '_ {
    move |e| XlsxError::Xml {
        part: part.to_string(),
        message: e.to_string(),
    }
}

/// Column letters for a zero-based index: 0 -> `A`, 26 -> `AA`.
pub(crate) fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Zero-based column index from a cell reference such as `AB12`.
pub(crate) fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let mut n = 0usize;
    for b in letters {
        n = n.checked_mul(26)?.checked_add(usize::from(b - b'A') + 1)?;
    }
    Some(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_roll_over() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn cell_references_give_column_index() {
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("z9"), Some(25));
        assert_eq!(column_index("AB12"), Some(27));
        assert_eq!(column_index("12"), None);
    }
}
