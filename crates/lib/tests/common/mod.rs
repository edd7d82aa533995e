#![allow(dead_code)]
//! # Common Test Utilities
//!
//! This module provides shared utilities for the `sqlsolver` integration tests,
//! such as tracing setup, temporary store files, and a scripted AI provider.

use async_trait::async_trait;
use dotenvy::dotenv;
use sqlsolver::providers::{ai::AiProvider, db::sqlite::SqliteProvider};
use sqlsolver::PromptError;
use std::sync::{Arc, Once, RwLock};
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A SQLite store living in its own temporary directory.
///
/// The directory is removed when the value is dropped, so keep it alive for the
/// duration of the test.
pub struct TempStore {
    pub provider: SqliteProvider,
    pub dir: TempDir,
}

impl TempStore {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("database.sql");
        let provider = SqliteProvider::new(path.to_str().expect("temp path is UTF-8"))
            .await
            .expect("Failed to create SqliteProvider");
        Self { provider, dir }
    }
}

// --- Mock AI Provider for Logic Testing ---

/// What the mock returns for every call.
#[derive(Clone, Debug)]
pub enum MockReply {
    Text(String),
    ApiFailure { status: u16, body: String },
    Empty,
}

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<(String, String)>>>,
    reply: MockReply,
}

impl MockAiProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            reply,
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(MockReply::Text(text.to_string()))
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.call_history.read().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.call_history
            .write()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::ApiFailure { status, body } => Err(PromptError::AiApi {
                status: *status,
                body: body.clone(),
            }),
            MockReply::Empty => Err(PromptError::EmptyCompletion),
        }
    }
}
