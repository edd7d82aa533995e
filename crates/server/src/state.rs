//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup: the OpenAI provider, the SQLite store, and the
//! `SqlSolver` that ties them together.

use crate::config::AppConfig;
use sqlsolver::{
    providers::{ai::openai::OpenAiProvider, db::sqlite::SqliteProvider},
    SqlSolver, SqlSolverBuilder,
};
use std::{sync::Arc, time::Duration};
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The pipeline client that loads uploads and translates questions.
    pub solver: Arc<SqlSolver>,
}

/// Builds the shared application state from the configuration.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider = OpenAiProvider::with_timeout(
        config.openai_api_url.clone(),
        Some(config.openai_api_key.clone()),
        config.openai_model.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    info!(model = %config.openai_model, "Initialized OpenAI provider.");

    let sqlite_provider = SqliteProvider::new(&config.db_path).await?;
    info!(db_path = %config.db_path, "Initialized local storage provider (SQLite).");

    let solver = SqlSolverBuilder::new()
        .ai_provider(Box::new(ai_provider))
        .storage_provider(sqlite_provider)
        .table_name(config.table_name.clone())
        .build()?;

    Ok(AppState {
        config: Arc::new(config),
        solver: Arc::new(solver),
    })
}
