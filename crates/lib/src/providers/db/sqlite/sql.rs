//! # SQLite Specific SQL Queries
//!
//! This module centralizes the SQL strings used by the SQLite provider.
//! This makes the core logic cleaner and isolates database-specific syntax.

use crate::ingest::ColumnKind;

/// Looks up a table by name. Expects one parameter (`?1`), the table name.
pub const TABLE_EXISTS_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;";

/// Asks SQLite to copy the write-ahead log back into the main database file.
pub const WAL_CHECKPOINT_SQL: &str = "PRAGMA wal_checkpoint(TRUNCATE);";

/// Quotes an identifier so that any column name from a CSV header is accepted.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn drop_table(table_name: &str) -> String {
    format!("DROP TABLE IF EXISTS {};", quote_identifier(table_name))
}

/// Returns the `CREATE TABLE` statement for the given columns and their kinds.
pub fn create_table(table_name: &str, headers: &[String], kinds: &[ColumnKind]) -> String {
    let columns_def = headers
        .iter()
        .zip(kinds.iter())
        .map(|(h, k)| format!("{} {}", quote_identifier(h), k.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE {} ({columns_def});",
        quote_identifier(table_name)
    )
}

/// Returns a positional `INSERT` statement covering every column.
pub fn insert_row(table_name: &str, headers: &[String]) -> String {
    let columns = headers
        .iter()
        .map(|h| quote_identifier(h))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (0..headers.len())
        .map(|_| "?")
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({columns}) VALUES ({placeholders})",
        quote_identifier(table_name)
    )
}

/// Lists the columns of a table: cid, name, type, notnull, dflt_value, pk.
pub fn table_info(table_name: &str) -> String {
    format!("PRAGMA table_info({});", quote_identifier(table_name))
}

pub fn count_rows(table_name: &str) -> String {
    format!("SELECT COUNT(*) FROM {};", quote_identifier(table_name))
}

pub fn select_all(table_name: &str) -> String {
    format!("SELECT * FROM {};", quote_identifier(table_name))
}
