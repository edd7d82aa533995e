use crate::{
    constants::DEFAULT_TABLE_NAME,
    errors::PromptError,
    providers::{ai::AiProvider, db::sqlite::SqliteProvider},
};
use std::fmt;
use tokio::sync::Mutex;

/// A client that loads an uploaded CSV file, dumps the store's schema, and asks
/// an AI provider to translate a question into SQL.
pub struct SqlSolver {
    pub ai_provider: Box<dyn AiProvider>,
    pub storage_provider: SqliteProvider,
    pub(crate) table_name: String,
    /// Serializes the load and schema-read steps of concurrent submissions.
    pub(crate) store_lock: Mutex<()>,
}

impl SqlSolver {
    /// The table every upload is loaded into.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl fmt::Debug for SqlSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlSolver")
            .field("ai_provider", &self.ai_provider)
            .field("storage_provider", &self.storage_provider)
            .field("table_name", &self.table_name)
            .finish_non_exhaustive()
    }
}

/// A builder for creating `SqlSolver` instances.
#[derive(Default)]
pub struct SqlSolverBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    storage_provider: Option<SqliteProvider>,
    table_name: Option<String>,
}

impl SqlSolverBuilder {
    /// Creates a new `SqlSolverBuilder`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlsolver::SqlSolverBuilder;
    ///
    /// let builder = SqlSolverBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider used for translation.
    pub fn ai_provider(mut self, ai_provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(ai_provider);
        self
    }

    /// Sets the SQLite store that uploads are loaded into.
    pub fn storage_provider(mut self, storage_provider: SqliteProvider) -> Self {
        self.storage_provider = Some(storage_provider);
        self
    }

    /// Overrides the target table name (defaults to `tableQ`).
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Builds the `SqlSolver`.
    ///
    /// Fails with `MissingAiProvider` or `MissingStorageProvider` when either
    /// dependency was not supplied.
    pub fn build(self) -> Result<SqlSolver, PromptError> {
        let ai_provider = self.ai_provider.ok_or(PromptError::MissingAiProvider)?;
        let storage_provider = self
            .storage_provider
            .ok_or(PromptError::MissingStorageProvider)?;

        Ok(SqlSolver {
            ai_provider,
            storage_provider,
            table_name: self
                .table_name
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            store_lock: Mutex::new(()),
        })
    }
}
