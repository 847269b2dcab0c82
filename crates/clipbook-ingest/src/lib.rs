//! Spreadsheet ingestion for the clipbook review workflow.
//!
//! This crate turns a tabular source (CSV or XLSX) into a normalized
//! [`RowSet`](clipbook_model::RowSet) and writes it back.
//!
//! # Features
//!
//! - **Column mapping**: resolve logical fields (URL, text, dates, flags)
//!   from headers by alias, fuzzy match, or explicit override
//! - **Normalization**: drop rows without a URL and exact duplicates, sort
//!   by best-available date, recover review status columns
//! - **Persistence**: whole-file rewrites via temp file + rename
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use clipbook_ingest::{LoadOptions, load_rows, persist_rows};
//!
//! let loaded = load_rows(Path::new("posts.xlsx"), &LoadOptions::default())?;
//! println!("removed {} rows without a URL", loaded.report.removed_missing_url);
//! persist_rows(Path::new("posts.xlsx"), &loaded.rows)?;
//! ```

mod csv;
mod dates;
mod error;
mod io;
mod load;
mod schema;
mod table;
mod xlsx;

// === Error Types ===
pub use error::{IngestError, Result, SchemaError};

// === Column Mapping ===
pub use schema::{
    ColumnMapping, ColumnMatch, ColumnOverrides, FUZZY_MATCH_THRESHOLD, LogicalField, MatchKind,
    resolve_columns,
};

// === Tables ===
pub use table::{RawTable, SourceFormat, encode_table, read_table};

// === Row Loading ===
pub use load::{LoadOptions, LoadReport, LoadedRows, build_row_set, encode_rows, load_rows, persist_rows};

// === Values ===
pub use dates::{parse_date, parse_flag};

// === File I/O ===
pub use io::write_atomic;
