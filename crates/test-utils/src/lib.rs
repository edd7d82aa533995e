use anyhow::Result;
use async_trait::async_trait;
use sqlsolver::errors::PromptError;
use sqlsolver::providers::{ai::AiProvider, db::sqlite::SqliteProvider};
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// --- Test Setup ---

/// A helper struct that gives each test its own SQLite store file.
///
/// The store lives in a temporary directory that is deleted on drop.
pub struct TestSetup {
    pub storage_provider: SqliteProvider,
    pub db_path: PathBuf,
    _dir: TempDir,
}

impl TestSetup {
    /// Creates a new store file named `database.sql` in a fresh temporary directory.
    pub async fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("database.sql");
        let path_str = db_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("temporary path is not valid UTF-8"))?;
        let storage_provider = SqliteProvider::new(path_str).await?;

        Ok(Self {
            storage_provider,
            db_path,
            _dir: dir,
        })
    }
}

// --- CSV Fixtures ---

/// A small employee table with text, integer and real columns.
pub const EMPLOYEES_CSV: &str = "name,department,age,salary\n\
Ada,Engineering,36,120000.5\n\
Grace,Engineering,45,135000\n\
Alan,Research,41,98000.25\n";

/// A second, differently shaped table used to check that uploads replace each other.
pub const CITIES_CSV: &str = "city,country\nOslo,Norway\nLima,Peru\n";

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
enum MockOutcome {
    Reply(String),
    Fail { status: u16, body: String },
}

/// An `AiProvider` that returns a fixed outcome and records every call.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    outcome: MockOutcome,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    /// A provider that answers every request with `response`.
    pub fn new(response: &str) -> Self {
        Self {
            outcome: MockOutcome::Reply(response.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that fails every request with an API error.
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            outcome: MockOutcome::Fail {
                status,
                body: body.to_string(),
            },
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Retrieves the recorded `(system_prompt, user_prompt)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new("SELECT 1")
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        match &self.outcome {
            MockOutcome::Reply(response) => Ok(response.clone()),
            MockOutcome::Fail { status, body } => Err(PromptError::AiApi {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
