//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared across
//! the `sqlsolver` workspace: storage locations, model defaults and the fixed
//! generation parameters sent with every chat-completion request.

/// The default path of the SQLite file that holds the uploaded table.
pub const DEFAULT_DB_FILE: &str = "database.sql";

/// The name of the table that every upload replaces.
pub const DEFAULT_TABLE_NAME: &str = "tableQ";

/// The default OpenAI-compatible chat-completions endpoint.
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default model used for SQL generation.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Sampling temperature for SQL generation. Zero keeps the output deterministic.
pub const SQL_GENERATION_TEMPERATURE: f64 = 0.0;

/// Upper bound on the number of tokens in a generated query.
pub const SQL_GENERATION_MAX_TOKENS: u32 = 500;

/// Sequences at which the model stops generating.
pub const SQL_GENERATION_STOP: [&str; 2] = ["--", ";"];

/// Default timeout, in seconds, for a single request to the hosted model.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
