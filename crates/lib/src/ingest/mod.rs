//! # Ingestion Logic
//!
//! This module turns an uploaded CSV file into a typed, in-memory table that the
//! SQLite provider writes into the store.

pub mod csv;

pub use self::csv::{parse_csv, ColumnKind, CsvTable, IngestCsvError};
