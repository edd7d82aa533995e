//! # Application Configuration
//!
//! This module defines the configuration structure for the `sqlsolver-server` and
//! provides the logic for loading it from an optional `config.yml` file and
//! environment variables. The OpenAI API key is the only required value; the
//! server refuses to start without it.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use sqlsolver::constants::{
    DEFAULT_DB_FILE, DEFAULT_OPENAI_API_URL, DEFAULT_OPENAI_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TABLE_NAME,
};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

/// The config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
    /// Indicates a required secret is absent or empty.
    MissingSecret(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
            ConfigError::MissingSecret(name) => {
                write!(f, "Missing required secret '{name}'. Set it in the environment or .env.")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure.
#[derive(Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The SQLite file uploads are loaded into. Loaded from `DB_PATH` env var.
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// The table every upload replaces.
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// The hosted model's API key. Loaded from `OPENAI_API_KEY` env var.
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Timeout for one chat-completion request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("db_path", &self.db_path)
            .field("table_name", &self.table_name)
            .field("openai_api_key", &"<redacted>")
            .field("openai_api_url", &self.openai_api_url)
            .field("openai_model", &self.openai_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    8501
}

fn default_db_path() -> String {
    DEFAULT_DB_FILE.to_string()
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

fn default_openai_api_url() -> String {
    DEFAULT_OPENAI_API_URL.to_string()
}

fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// Layers, from lowest to highest precedence:
/// - built-in defaults on `AppConfig`;
/// - the YAML file at `config_path_override`, or `config.yml` in the working
///   directory if it exists. `${VAR}` placeholders are replaced from the environment;
/// - plain environment variables such as `PORT`, `DB_PATH` and `OPENAI_API_KEY`;
/// - `SQLSOLVER_`-prefixed variables (e.g. `SQLSOLVER_OPENAI_MODEL`).
///
/// An explicit path that does not exist is an error, as is a missing or empty
/// `OPENAI_API_KEY`.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let config_path = config_path_override.unwrap_or(DEFAULT_CONFIG_FILE);
    match read_and_substitute(config_path)? {
        Some(content) => {
            info!("Loading configuration from '{config_path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None if config_path_override.is_some() => {
            return Err(ConfigError::NotFound(format!(
                "Config file not found at '{config_path}'."
            )));
        }
        None => info!("No '{config_path}' found. Using defaults and environment."),
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("SQLSOLVER")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;

    if config.openai_api_key.trim().is_empty() {
        return Err(ConfigError::MissingSecret("OPENAI_API_KEY"));
    }

    Ok(config)
}
