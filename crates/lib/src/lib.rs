//! # Natural Language to SQL over an Uploaded CSV
//!
//! This crate loads a CSV file into a local SQLite store, dumps the store as a
//! schema description, and asks a configurable AI provider to translate a
//! natural-language question into a SQL query. The query is returned as text;
//! it is never validated or executed.

pub mod constants;
pub mod errors;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod schema;
pub mod translate;
pub mod types;

pub use errors::PromptError;
pub use translate::strip_sql_fence;
pub use types::{SqlSolver, SqlSolverBuilder};

use tracing::{debug, info};

impl SqlSolver {
    /// Runs the whole pipeline for one submission.
    ///
    /// The CSV replaces the stored table, the store file is read back as the
    /// schema, and the question is translated. Load failures are returned as
    /// errors; translation failures come back as descriptive text.
    pub async fn solve(&self, csv_data: &[u8], question: &str) -> Result<String, PromptError> {
        let db_schema = {
            let _guard = self.store_lock.lock().await;
            let rows = self
                .storage_provider
                .replace_table_from_csv(&self.table_name, csv_data)
                .await?;
            info!(
                "[solve] Loaded {rows} rows into '{}'. Reading schema from '{}'.",
                self.table_name,
                self.storage_provider.path()
            );
            schema::read_schema_dump(self.storage_provider.path()).await
        };

        Ok(self
            .generate_sql_query(question, db_schema.as_deref())
            .await)
    }

    /// Translates a question into SQL, describing any failure in the returned text.
    ///
    /// Success and failure are both plain strings; a failure starts with
    /// `OpenAI API Error:` or `An unexpected error occurred:`.
    pub async fn generate_sql_query(&self, question: &str, db_schema: Option<&str>) -> String {
        match self.try_generate_sql_query(question, db_schema).await {
            Ok(query) => query,
            Err(e) => {
                tracing::error!("[generate_sql_query] Translation failed: {e:?}");
                translate::describe_failure(&e)
            }
        }
    }

    /// Translates a question into SQL, returning provider failures as errors.
    pub async fn try_generate_sql_query(
        &self,
        question: &str,
        db_schema: Option<&str>,
    ) -> Result<String, PromptError> {
        info!("[generate_sql_query] received question: {question:?}");
        let system_prompt = prompts::build_sql_system_prompt(db_schema);

        debug!(user_prompt = %question, "--> Sending prompts to AI Provider");
        let raw_response = self.ai_provider.generate(&system_prompt, question).await?;
        debug!("<-- Query from AI: {}", &raw_response);

        Ok(strip_sql_fence(&raw_response))
    }
}
