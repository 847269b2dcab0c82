//! CSV encoding.

use csv::{ReaderBuilder, WriterBuilder};

use crate::table::RawTable;

pub(crate) fn parse_csv(bytes: &[u8]) -> Result<RawTable, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(normalize_cell).collect());
    }
    Ok(RawTable::from_records(records))
}

fn normalize_cell(raw: &str) -> String {
    raw.trim_matches('\u{feff}').to_string()
}

pub(crate) fn encode_csv(table: &RawTable) -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fields_may_span_lines() {
        let table = parse_csv(b"URL,Text\nhttps://x.com/1,\"line one\nline \"\"two\"\"\"\n").unwrap();
        assert_eq!(table.headers, vec!["URL", "Text"]);
        assert_eq!(table.rows[0][1], "line one\nline \"two\"");
    }

    #[test]
    fn encode_quotes_only_when_needed() {
        let table = RawTable {
            headers: vec!["URL".into(), "Text".into()],
            rows: vec![vec!["https://x.com/1".into(), "a, b".into()]],
        };
        let bytes = encode_csv(&table).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "URL,Text\nhttps://x.com/1,\"a, b\"\n");
    }
}
