//! XLSX writing: a single worksheet with inline strings.

use std::io::{Cursor, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{XlsxError, column_name};
use crate::table::RawTable;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs></styleSheet>"#;

/// Style index of the bold header font in [`STYLES`].
const HEADER_STYLE: &str = "1";

pub(crate) fn encode_xlsx(table: &RawTable) -> Result<Vec<u8>, XlsxError> {
    let sheet = sheet_xml(table)?;
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        for (name, bytes) in [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", ROOT_RELS.as_bytes()),
            ("xl/workbook.xml", WORKBOOK.as_bytes()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
            ("xl/styles.xml", STYLES.as_bytes()),
            ("xl/worksheets/sheet1.xml", sheet.as_slice()),
        ] {
            zip.start_file(name, entry_options())?;
            zip.write_all(bytes)?;
        }
        zip.finish()?;
    }
    Ok(buffer)
}

/// Fixed entry timestamps keep identical tables byte-identical.
fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().last_modified_time(zip::DateTime::default())
}

enum CellValue<'a> {
    Boolean(bool),
    Number(&'a str),
    Text(&'a str),
}

/// Cells that read back unchanged as a boolean or number are stored
/// typed; everything else is an inline string.
fn classify(value: &str) -> CellValue<'_> {
    match value {
        "TRUE" => return CellValue::Boolean(true),
        "FALSE" => return CellValue::Boolean(false),
        _ => {}
    }
    let plain_number = !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'.' || b == b'-')
        && value.parse::<f64>().is_ok_and(|n| n.is_finite() && n.to_string() == value);
    if plain_number {
        CellValue::Number(value)
    } else {
        CellValue::Text(value)
    }
}

/// Strip characters XML 1.0 cannot carry.
fn xml_safe(value: &str) -> String {
    value
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .collect()
}

fn sheet_xml(table: &RawTable) -> Result<Vec<u8>, XlsxError> {
    let mut xml = Writer::new(Vec::new());
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    let mut root = BytesStart::new("worksheet");
    root.push_attribute(("xmlns", SPREADSHEET_NS));
    xml.write_event(Event::Start(root))?;
    xml.write_event(Event::Start(BytesStart::new("sheetData")))?;

    write_row(&mut xml, 1, &table.headers, Some(HEADER_STYLE))?;
    for (idx, row) in table.rows.iter().enumerate() {
        write_row(&mut xml, idx + 2, row, None)?;
    }

    xml.write_event(Event::End(BytesEnd::new("sheetData")))?;
    xml.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(xml.into_inner())
}

fn write_row(
    xml: &mut Writer<Vec<u8>>,
    number: usize,
    cells: &[String],
    style: Option<&str>,
) -> Result<(), XlsxError> {
    let row_ref = number.to_string();
    let mut row = BytesStart::new("row");
    row.push_attribute(("r", row_ref.as_str()));
    xml.write_event(Event::Start(row))?;

    for (col, value) in cells.iter().enumerate() {
        if value.is_empty() {
            continue;
        }
        let cell_ref = format!("{}{number}", column_name(col));
        let mut cell = BytesStart::new("c");
        cell.push_attribute(("r", cell_ref.as_str()));
        if let Some(style) = style {
            cell.push_attribute(("s", style));
        }
        let header = style.is_some();
        match classify(value) {
            CellValue::Boolean(flag) if !header => {
                cell.push_attribute(("t", "b"));
                xml.write_event(Event::Start(cell))?;
                write_text_element(xml, "v", if flag { "1" } else { "0" }, false)?;
            }
            CellValue::Number(digits) if !header => {
                xml.write_event(Event::Start(cell))?;
                write_text_element(xml, "v", digits, false)?;
            }
            _ => {
                cell.push_attribute(("t", "inlineStr"));
                xml.write_event(Event::Start(cell))?;
                xml.write_event(Event::Start(BytesStart::new("is")))?;
                write_text_element(xml, "t", &xml_safe(value), true)?;
                xml.write_event(Event::End(BytesEnd::new("is")))?;
            }
        }
        xml.write_event(Event::End(BytesEnd::new("c")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("row")))?;
    Ok(())
}

fn write_text_element(
    xml: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
    preserve_space: bool,
) -> Result<(), XlsxError> {
    let mut start = BytesStart::new(name);
    if preserve_space {
        start.push_attribute(("xml:space", "preserve"));
    }
    xml.write_event(Event::Start(start))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xlsx::parse_xlsx;

    #[test]
    fn cells_classify_as_number_bool_or_text() {
        assert!(matches!(classify("TRUE"), CellValue::Boolean(true)));
        assert!(matches!(classify("42"), CellValue::Number("42")));
        assert!(matches!(classify("45356.5"), CellValue::Number(_)));
        assert!(matches!(classify("007"), CellValue::Text(_)));
        assert!(matches!(classify("1e5"), CellValue::Text(_)));
        assert!(matches!(classify("true"), CellValue::Text(_)));
    }

    #[test]
    fn written_workbook_reads_back() {
        let table = RawTable {
            headers: vec!["URL".into(), "Text".into(), "Reviewed Passed".into()],
            rows: vec![
                vec!["https://x.com/1".into(), "Fish & <chips>\nline two".into(), "TRUE".into()],
                vec!["https://x.com/2".into(), " 007 ".into(), "FALSE".into()],
            ],
        };
        let bytes = encode_xlsx(&table).unwrap();
        assert_eq!(parse_xlsx(&bytes).unwrap(), table);
    }
}
