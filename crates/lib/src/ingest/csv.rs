//! # CSV Ingestion Logic
//!
//! This module parses uploaded CSV data and "sniffs" a SQLite type for every
//! column so the stored table carries a useful schema. Headers are kept verbatim,
//! missing-value markers become `NULL`, and each column gets the narrowest type
//! that fits all of its values.

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;
use turso::Value as TursoValue;

/// Custom error types for the CSV ingestion process.
#[derive(Error, Debug)]
pub enum IngestCsvError {
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] ::csv::Error),
    #[error("No columns to parse from file")]
    NoData,
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("Failed to get database connection: {0}")]
    Connection(String),
}

/// Field values that are read as missing and stored as `NULL`.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The storage type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    /// Stored as `INTEGER` 0/1.
    Boolean,
    Text,
}

impl ColumnKind {
    /// The SQLite type name used in the `CREATE TABLE` statement.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Integer | ColumnKind::Boolean => "INTEGER",
            ColumnKind::Real => "REAL",
            ColumnKind::Text => "TEXT",
        }
    }

    /// Converts one raw field into the value bound for this column.
    pub fn to_value(self, field: &str) -> TursoValue {
        if is_missing(field) {
            return TursoValue::Null;
        }
        match self {
            ColumnKind::Integer => field
                .parse::<i64>()
                .map(TursoValue::Integer)
                .unwrap_or_else(|_| TursoValue::Text(field.to_string())),
            ColumnKind::Real => field
                .parse::<f64>()
                .map(TursoValue::Real)
                .unwrap_or_else(|_| TursoValue::Text(field.to_string())),
            ColumnKind::Boolean => match parse_bool(field) {
                Some(b) => TursoValue::Integer(i64::from(b)),
                None => TursoValue::Text(field.to_string()),
            },
            ColumnKind::Text => TursoValue::Text(field.to_string()),
        }
    }
}

/// A parsed CSV file: column names, their inferred kinds, and the data rows.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub kinds: Vec<ColumnKind>,
    pub records: Vec<::csv::StringRecord>,
}

impl CsvTable {
    /// Converts a record into the positional parameters of an `INSERT`.
    ///
    /// Fields missing from the end of a short record are bound as `NULL`.
    pub fn record_values(&self, record: &::csv::StringRecord) -> Vec<TursoValue> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| kind.to_value(record.get(i).unwrap_or("")))
            .collect()
    }
}

/// Parses CSV bytes into a `CsvTable`.
///
/// The first row is the header. Short rows are accepted and their missing
/// trailing fields read as missing values; a row with more fields than the
/// header fails the whole parse.
pub fn parse_csv(data: &[u8]) -> Result<CsvTable, IngestCsvError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data);

    let raw_headers = reader.headers()?.clone();
    if raw_headers.is_empty() {
        return Err(IngestCsvError::NoData);
    }
    let headers = dedup_headers(&raw_headers);

    let mut records: Vec<::csv::StringRecord> = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(IngestCsvError::TooManyFields {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: headers.len(),
                found: record.len(),
            });
        }
        records.push(record);
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|i| sniff_column_kind(records.iter().map(|r| r.get(i).unwrap_or(""))))
        .collect();
    debug!(?headers, ?kinds, rows = records.len(), "Parsed CSV upload");

    Ok(CsvTable {
        headers,
        kinds,
        records,
    })
}

/// Names blank headers `Unnamed: {index}`, then renames repeated names to
/// `name.1`, `name.2`, ... in order of appearance.
fn dedup_headers(headers: &::csv::StringRecord) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let mut name = if header.is_empty() {
                format!("Unnamed: {i}")
            } else {
                header.to_string()
            };
            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{name}.{count}");
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), count + 1);
            name
        })
        .collect()
}

/// Picks the narrowest kind that holds every value of a column.
fn sniff_column_kind<'a>(values: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut total = 0usize;
    let mut missing = 0usize;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for value in values {
        total += 1;
        if is_missing(value) {
            missing += 1;
            continue;
        }
        all_int &= value.parse::<i64>().is_ok();
        all_float &= value.parse::<f64>().is_ok();
        all_bool &= parse_bool(value).is_some();
    }

    if total == 0 {
        return ColumnKind::Text;
    }
    if missing == total {
        return ColumnKind::Real;
    }
    if all_int {
        // Integers with gaps are widened to REAL, the way a float column holds NaN.
        return if missing == 0 {
            ColumnKind::Integer
        } else {
            ColumnKind::Real
        };
    }
    if all_float {
        return ColumnKind::Real;
    }
    if all_bool && missing == 0 {
        return ColumnKind::Boolean;
    }
    ColumnKind::Text
}

fn is_missing(field: &str) -> bool {
    NA_VALUES.contains(&field)
}

fn parse_bool(field: &str) -> Option<bool> {
    match field {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}
