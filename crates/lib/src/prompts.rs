//! # SQL Generation Prompt
//!
//! The fixed system prompt sent with every translation request. The schema dump
//! is interpolated into the `{db_schema}` placeholder.

/// The system prompt for translating a question into SQL.
///
/// Placeholders: `{db_schema}`
pub const SQL_GENERATION_SYSTEM_PROMPT: &str = "You are a very helpful assistant that translates natural language questions into MySQL SQL queries. You are given the following database schema:\n\n{db_schema}\n\nYour task is to generate the correct SQL query for the user's question. Only return the SQL query, without any additional text or explanations.Do not include ```sql or any other markdown formatting.";

/// Text interpolated in place of a schema that could not be read.
pub const MISSING_SCHEMA_PLACEHOLDER: &str = "None";

/// Builds the system prompt for the given schema dump.
///
/// A missing schema is rendered as `None` rather than rejected; the request is
/// still sent.
pub fn build_sql_system_prompt(db_schema: Option<&str>) -> String {
    SQL_GENERATION_SYSTEM_PROMPT.replace(
        "{db_schema}",
        db_schema.unwrap_or(MISSING_SCHEMA_PLACEHOLDER),
    )
}
