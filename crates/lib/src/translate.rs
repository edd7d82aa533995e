//! # Completion Post-Processing
//!
//! Turns the model's raw reply into the text shown to the user: markdown fences
//! around the query are removed, and provider failures are rendered as readable
//! messages in place of a query.

use crate::errors::PromptError;

const SQL_FENCE_OPEN: &str = "```sql";
const FENCE_CLOSE: &str = "```";

/// Prefix for failures reported by the hosted model's API.
pub const API_ERROR_PREFIX: &str = "OpenAI API Error:";

/// Prefix for every other translation failure.
pub const UNEXPECTED_ERROR_PREFIX: &str = "An unexpected error occurred:";

/// Strips a leading "```sql" and a trailing "```" from a completion.
///
/// Only the outer ends are inspected; fences in the middle of the text stay.
pub fn strip_sql_fence(raw: &str) -> String {
    let mut query = raw.trim();
    if let Some(rest) = query.strip_prefix(SQL_FENCE_OPEN) {
        query = rest.trim();
    }
    if let Some(rest) = query.strip_suffix(FENCE_CLOSE) {
        query = rest.trim();
    }
    query.to_string()
}

/// Renders a translation failure as the text displayed instead of a query.
pub fn describe_failure(err: &PromptError) -> String {
    if err.is_api_error() {
        format!("{API_ERROR_PREFIX} {err}")
    } else {
        format!("{UNEXPECTED_ERROR_PREFIX} {err}")
    }
}
