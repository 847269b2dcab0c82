//! XLSX reading: shared strings plus the first worksheet.

use std::io::{Cursor, Read, Seek};

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use zip::ZipArchive;
use zip::result::ZipError;

use super::{XlsxError, column_index, xml_error};
use crate::table::RawTable;

const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const DEFAULT_SHEET: &str = "xl/worksheets/sheet1.xml";

pub(crate) fn parse_xlsx(bytes: &[u8]) -> Result<RawTable, XlsxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let shared = match read_part(&mut archive, SHARED_STRINGS)? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };
    let sheet_path = first_sheet_path(&mut archive)?;
    let sheet = read_part(&mut archive, &sheet_path)?
        .ok_or_else(|| XlsxError::MissingPart(sheet_path.clone()))?;
    let records = parse_sheet(&sheet, &shared, &sheet_path)?;
    tracing::debug!(sheet = %sheet_path, rows = records.len(), "read worksheet");
    Ok(RawTable::from_records(records))
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, XlsxError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

fn attribute(element: &BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local_name)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

fn resolve_reference(reference: &BytesRef<'_>, part: &str) -> Result<String, XlsxError> {
    if let Some(ch) = reference.resolve_char_ref().map_err(xml_error(part))? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(xml_error(part))?;
    Ok(match resolve_predefined_entity(&name) {
        Some(value) => value.to_string(),
        None => format!("&{name};"),
    })
}

/// Worksheet path of the first `<sheet>` in the workbook, falling back to
/// `sheet1.xml` when the workbook or its relationships are absent.
fn first_sheet_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, XlsxError> {
    let Some(workbook) = read_part(archive, WORKBOOK)? else {
        return Ok(DEFAULT_SHEET.to_string());
    };
    let Some(rel_id) = first_element_attribute(&workbook, WORKBOOK, b"sheet", |e| {
        attribute(e, b"id")
    })?
    else {
        return Ok(DEFAULT_SHEET.to_string());
    };
    let Some(rels) = read_part(archive, WORKBOOK_RELS)? else {
        return Ok(DEFAULT_SHEET.to_string());
    };
    let target = first_element_attribute(&rels, WORKBOOK_RELS, b"Relationship", |e| {
        (attribute(e, b"Id").as_deref() == Some(rel_id.as_str()))
            .then(|| attribute(e, b"Target"))
            .flatten()
    })?;
    Ok(match target {
        Some(target) => match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{target}"),
        },
        None => DEFAULT_SHEET.to_string(),
    })
}

fn first_element_attribute(
    xml: &[u8],
    part: &str,
    element: &[u8],
    extract: impl Fn(&BytesStart<'_>) -> Option<String>,
) -> Result<Option<String>, XlsxError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error(part))? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == element => {
                if let Some(value) = extract(&e) {
                    return Ok(Some(value));
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, XlsxError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_phonetic = false;
    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(xml_error(SHARED_STRINGS))?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => strings.push(current.take().unwrap_or_default()),
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Event::Text(text) if in_text && !in_phonetic => {
                if let Some(value) = current.as_mut() {
                    value.push_str(&text.decode().map_err(xml_error(SHARED_STRINGS))?);
                }
            }
            Event::GeneralRef(reference) if in_text && !in_phonetic => {
                if let Some(value) = current.as_mut() {
                    value.push_str(&resolve_reference(&reference, SHARED_STRINGS)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

struct PendingCell {
    column: usize,
    kind: String,
    value: String,
}

impl PendingCell {
    fn resolve(self, shared: &[String]) -> String {
        match self.kind.as_str() {
            "s" => self
                .value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|index| shared.get(index))
                .cloned()
                .unwrap_or_default(),
            "b" => if self.value.trim() == "1" { "TRUE" } else { "FALSE" }.to_string(),
            _ => self.value,
        }
    }
}

fn place(row: &mut Vec<String>, column: usize, value: String) {
    if row.len() <= column {
        row.resize(column + 1, String::new());
    }
    row[column] = value;
}

fn parse_sheet(xml: &[u8], shared: &[String], part: &str) -> Result<Vec<Vec<String>>, XlsxError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut next_column = 0usize;
    let mut cell: Option<PendingCell> = None;
    let mut capture = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error(part))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    row = Vec::new();
                    next_column = 0;
                }
                b"c" => {
                    let column = attribute(&e, b"r")
                        .and_then(|r| column_index(&r))
                        .unwrap_or(next_column);
                    cell = Some(PendingCell {
                        column,
                        kind: attribute(&e, b"t").unwrap_or_default(),
                        value: String::new(),
                    });
                }
                b"v" | b"t" => capture = cell.is_some(),
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => rows.push(Vec::new()),
                b"c" => {
                    next_column = attribute(&e, b"r")
                        .and_then(|r| column_index(&r))
                        .unwrap_or(next_column)
                        + 1;
                }
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"row" => rows.push(std::mem::take(&mut row)),
                b"c" => {
                    if let Some(pending) = cell.take() {
                        let column = pending.column;
                        place(&mut row, column, pending.resolve(shared));
                        next_column = column + 1;
                    }
                }
                b"v" | b"t" => capture = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Event::Text(text) if capture && !in_phonetic => {
                if let Some(pending) = cell.as_mut() {
                    pending
                        .value
                        .push_str(&text.decode().map_err(xml_error(part))?);
                }
            }
            Event::GeneralRef(reference) if capture && !in_phonetic => {
                if let Some(pending) = cell.as_mut() {
                    pending.value.push_str(&resolve_reference(&reference, part)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_strings_join_runs_and_unescape() {
        let xml = br#"<?xml version="1.0"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <si><t>URL</t></si>
  <si><r><t>Fish </t></r><r><t>&amp; chips</t></r></si>
  <si/>
  <si><t>caf&#233;</t><rPh><t>ignored</t></rPh></si>
</sst>"#;
        let strings = parse_shared_strings(xml).unwrap();
        assert_eq!(strings, vec!["URL", "Fish & chips", "", "café"]);
    }

    #[test]
    fn sheet_cells_decode_by_type() {
        let shared = vec!["URL".to_string(), "Text".to_string()];
        let xml = br#"<worksheet><sheetData>
  <row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1" t="s"><v>1</v></c></row>
  <row r="2"><c r="A2" t="inlineStr"><is><t>https://x.com/1</t></is></c><c r="B2" t="b"><v>1</v></c><c r="C2"><v>45356</v></c></row>
</sheetData></worksheet>"#;
        let rows = parse_sheet(xml, &shared, "sheet").unwrap();
        assert_eq!(rows[0], vec!["URL", "", "Text"]);
        assert_eq!(rows[1], vec!["https://x.com/1", "TRUE", "45356"]);
    }
}
