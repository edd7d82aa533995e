use crate::{
    errors::PromptError,
    ingest::{parse_csv, CsvTable, IngestCsvError},
};
use serde_json::Value;
use std::fmt::{self, Debug};
use tracing::{debug, info, warn};
use turso::{Connection, Database, Value as TursoValue};

pub mod sql;

/// A provider for the local SQLite store, backed by Turso.
///
/// The store holds a single uploaded table that every load replaces. When cloned,
/// the provider shares the same underlying database.
#[derive(Clone)]
pub struct SqliteProvider {
    /// The Turso database instance. It's cloneable and thread-safe.
    pub db: Database,
    path: String,
}

impl SqliteProvider {
    /// Creates a new `SqliteProvider` for a database file, creating the file if needed.
    ///
    /// `":memory:"` gives an isolated in-memory database; it has no file for the
    /// schema dump to read.
    pub async fn new(db_path: &str) -> Result<Self, PromptError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| PromptError::StorageConnection(e.to_string()))?;

        Ok(Self {
            db,
            path: db_path.to_string(),
        })
    }

    /// The path the database was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn connect(&self) -> Result<Connection, PromptError> {
        self.db
            .connect()
            .map_err(|e| PromptError::StorageConnection(e.to_string()))
    }

    /// Loads CSV data into `table_name`, dropping whatever the table held before.
    ///
    /// Returns the number of inserted rows. Malformed CSV is reported before the
    /// existing table is touched, and the drop, create and inserts share one
    /// transaction, so a failed load leaves the previous table in place.
    pub async fn replace_table_from_csv(
        &self,
        table_name: &str,
        data: &[u8],
    ) -> Result<usize, PromptError> {
        let table = parse_csv(data)?;

        let conn = self
            .db
            .connect()
            .map_err(|e| IngestCsvError::Connection(e.to_string()))?;

        conn.execute("BEGIN TRANSACTION", ())
            .await
            .map_err(IngestCsvError::from)?;

        let insert_count = match write_table(&conn, table_name, &table).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to load table '{table_name}': {e:?}. Rolling back transaction.");
                conn.execute("ROLLBACK", ())
                    .await
                    .map_err(IngestCsvError::from)?;
                return Err(IngestCsvError::Database(e).into());
            }
        };

        conn.execute("COMMIT", ())
            .await
            .map_err(IngestCsvError::from)?;
        info!("Transaction committed. Loaded {insert_count} rows into '{table_name}'.");

        checkpoint(&conn).await;
        Ok(insert_count)
    }

    /// Returns `true` if `table_name` exists in the store.
    pub async fn table_exists(&self, table_name: &str) -> Result<bool, PromptError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(sql::TABLE_EXISTS_SQL, turso::params![table_name.to_string()])
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
        let row = rows
            .next()
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
        Ok(row.is_some())
    }

    /// Returns the column names of `table_name`, in table order.
    pub async fn column_names(&self, table_name: &str) -> Result<Vec<String>, PromptError> {
        let conn = self.connect()?;

        let mut rows = conn
            .query(&sql::table_info(table_name), ())
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;

        let mut names = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?
        {
            // PRAGMA table_info columns: cid, name, type, notnull, dflt_value, pk
            if let Ok(TursoValue::Text(name)) = row.get_value(1) {
                names.push(name);
            }
        }

        if names.is_empty() {
            return Err(PromptError::StorageOperationFailed(format!(
                "Table '{table_name}' not found or has no columns."
            )));
        }
        Ok(names)
    }

    /// Counts the rows currently stored in `table_name`.
    pub async fn row_count(&self, table_name: &str) -> Result<i64, PromptError> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(&sql::count_rows(table_name), ())
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
        match rows
            .next()
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?
        {
            Some(row) => match row.get_value(0) {
                Ok(TursoValue::Integer(n)) => Ok(n),
                other => Err(PromptError::StorageOperationFailed(format!(
                    "Unexpected COUNT(*) result: {other:?}"
                ))),
            },
            None => Ok(0),
        }
    }

    /// Reads every row of `table_name` as a JSON array of objects.
    pub async fn rows_as_json(&self, table_name: &str) -> Result<String, PromptError> {
        let conn = self.connect()?;

        let mut stmt = conn
            .prepare(&sql::select_all(table_name))
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;

        let column_names: Vec<String> = stmt
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut rows = stmt
            .query(())
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;

        let mut json_results: Vec<Value> = Vec::new();

        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?
        {
            let mut row_map = serde_json::Map::new();
            for (i, name) in column_names.iter().enumerate() {
                let value = row
                    .get_value(i)
                    .map_err(|e| PromptError::StorageOperationFailed(e.to_string()))?;
                row_map.insert(name.clone(), turso_value_to_json(value));
            }
            json_results.push(Value::Object(row_map));
        }

        Ok(serde_json::to_string(&json_results)?)
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteProvider")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl AsRef<Database> for SqliteProvider {
    fn as_ref(&self) -> &Database {
        &self.db
    }
}

/// Drops and recreates `table_name`, then inserts every record. Runs inside the
/// caller's transaction.
async fn write_table(
    conn: &Connection,
    table_name: &str,
    table: &CsvTable,
) -> Result<usize, turso::Error> {
    conn.execute(&sql::drop_table(table_name), ()).await?;

    let create_sql = sql::create_table(table_name, &table.headers, &table.kinds);
    info!("Executing CREATE TABLE statement: {create_sql}");
    conn.execute(&create_sql, ()).await?;

    let mut stmt = conn
        .prepare(&sql::insert_row(table_name, &table.headers))
        .await?;
    let mut insert_count = 0;
    for record in &table.records {
        if stmt.execute(table.record_values(record)).await? > 0 {
            insert_count += 1;
        }
    }
    Ok(insert_count)
}

/// Flushes the write-ahead log into the main file so a raw read of the file
/// sees the freshly loaded table.
async fn checkpoint(conn: &Connection) {
    match conn.query(sql::WAL_CHECKPOINT_SQL, ()).await {
        Ok(mut rows) => loop {
            match rows.next().await {
                Ok(Some(row)) => debug!("WAL checkpoint result: {:?}", row.get_value(0)),
                Ok(None) => {
                    debug!("WAL checkpoint completed.");
                    break;
                }
                Err(e) => {
                    warn!("WAL checkpoint failed: {e}");
                    break;
                }
            }
        },
        Err(e) => warn!("WAL checkpoint failed: {e}"),
    }
}

/// Converts a Turso value to a serde_json::Value.
fn turso_value_to_json(v: TursoValue) -> Value {
    match v {
        TursoValue::Null => Value::Null,
        TursoValue::Integer(i) => Value::Number(i.into()),
        TursoValue::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        TursoValue::Text(s) => Value::String(s),
        TursoValue::Blob(_) => Value::String("<blob>".to_string()),
    }
}
