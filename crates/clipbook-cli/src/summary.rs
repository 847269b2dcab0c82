use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use clipbook_cli::StatusReport;
use clipbook_ingest::{ColumnMapping, LoadReport, LogicalField, MatchKind};

pub fn print_status(report: &StatusReport) {
    println!("Source: {}", report.source.display());
    println!("Export name: {}", report.export_name);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Progress"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let counters = report.counters;
    table.add_row(vec![Cell::new("Passed"), Cell::new(counters.pass_count)]);
    table.add_row(vec![Cell::new("Bulleted"), Cell::new(counters.bullet_count)]);
    table.add_row(vec![
        Cell::new("Remaining"),
        count_cell(report.remaining, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_load_report(&report.load);

    if !report.topics.is_empty() {
        let mut topics = Table::new();
        topics.set_header(vec![header_cell("Topic"), header_cell("Excerpts")]);
        apply_table_style(&mut topics);
        align_column(&mut topics, 1, CellAlignment::Right);
        for topic in &report.topics {
            topics.add_row(vec![Cell::new(&topic.topic), Cell::new(topic.excerpts)]);
        }
        println!("{topics}");
    }
    print_mapping(&report.mapping);
}

pub fn print_load_report(report: &LoadReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Load"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Read"), Cell::new(report.total_rows)]);
    table.add_row(vec![
        Cell::new("Dropped: no URL"),
        count_cell(report.removed_missing_url, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Dropped: duplicate"),
        count_cell(report.removed_duplicates, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Undated"),
        count_cell(report.undated_rows, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Recovered as UNSORTED"),
        count_cell(report.recovered_unsorted, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Kept").add_attribute(Attribute::Bold),
        Cell::new(report.kept_rows()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_mapping(mapping: &ColumnMapping) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Match"),
    ]);
    apply_table_style(&mut table);
    for field in LogicalField::ALL {
        let row = match mapping.get(field) {
            Some(found) => vec![
                Cell::new(field),
                Cell::new(&found.header),
                match_cell(found.kind),
            ],
            None => vec![Cell::new(field), dim_cell("-"), dim_cell("not found")],
        };
        table.add_row(row);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::DarkGrey)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell("0")
    } else {
        Cell::new(count).fg(color)
    }
}

fn match_cell(kind: MatchKind) -> Cell {
    match kind {
        MatchKind::Override => Cell::new("config").fg(Color::Cyan),
        MatchKind::Alias => Cell::new("exact").fg(Color::Green),
        MatchKind::Fuzzy { score } => Cell::new(format!("fuzzy {score:.2}")).fg(Color::Yellow),
    }
}
