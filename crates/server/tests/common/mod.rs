//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `sqlsolver-server`
//! integration tests. `TestApp` spawns a real server on a random port with a
//! temporary SQLite store and an AI provider that either talks to an
//! `httpmock::MockServer` or is injected by the test.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use sqlsolver::{
    providers::{ai::openai::OpenAiProvider, ai::AiProvider, db::sqlite::SqliteProvider},
    SqlSolverBuilder,
};
use sqlsolver_server::{config::AppConfig, router::create_router, state::AppState};
use sqlsolver_test_utils::TestSetup;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::{net::TcpListener, task::JoinHandle};

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub storage_provider: SqliteProvider,
    pub db_path: PathBuf,
    _setup: TestSetup,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with an OpenAI provider pointed at the mock server.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start();
        let ai_provider = OpenAiProvider::new(
            mock_server.url(COMPLETIONS_PATH),
            Some("sk-test".to_string()),
            "gpt-3.5-turbo".to_string(),
        )?;
        Self::spawn_inner(mock_server, Box::new(ai_provider)).await
    }

    /// Spawns the server with the given AI provider.
    pub async fn spawn_with_provider(ai_provider: Box<dyn AiProvider>) -> Result<Self> {
        Self::spawn_inner(MockServer::start(), ai_provider).await
    }

    async fn spawn_inner(mock_server: MockServer, ai_provider: Box<dyn AiProvider>) -> Result<Self> {
        dotenvy::dotenv().ok();
        // `try_init` is used to prevent panic if the logger is already initialized.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let setup = TestSetup::new().await?;
        let storage_provider = setup.storage_provider.clone();
        let db_path = setup.db_path.clone();

        let solver = SqlSolverBuilder::new()
            .ai_provider(ai_provider)
            .storage_provider(storage_provider.clone())
            .build()?;

        let config = AppConfig {
            port: 0,
            db_path: db_path.to_string_lossy().into_owned(),
            table_name: solver.table_name().to_string(),
            openai_api_key: "sk-test".to_string(),
            openai_api_url: mock_server.url(COMPLETIONS_PATH),
            openai_model: "gpt-3.5-turbo".to_string(),
            request_timeout_secs: 5,
        };

        let app_state = AppState {
            config: Arc::new(config),
            solver: Arc::new(solver),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            storage_provider,
            db_path,
            _setup: setup,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Posts a form submission to `/`.
    pub async fn submit(&self, form: Form) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}/", self.address))
            .multipart(form)
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The receiver might already be gone if the server task panicked,
            // so we ignore the result of send.
            let _ = tx.send(());
        }
    }
}

// --- Form Builders ---

/// A form with a CSV upload and a question.
pub fn csv_form(csv: &str, question: &str) -> Form {
    Form::new()
        .part(
            "file",
            Part::bytes(csv.as_bytes().to_vec()).file_name("data.csv"),
        )
        .text("question", question.to_string())
}

/// A form as a browser sends it when no file was chosen.
pub fn form_without_file(question: &str) -> Form {
    Form::new()
        .part("file", Part::bytes(Vec::new()).file_name(""))
        .text("question", question.to_string())
}

/// The completion body the mock model returns.
pub fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}
