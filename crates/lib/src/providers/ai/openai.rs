use crate::{
    constants::{
        DEFAULT_REQUEST_TIMEOUT_SECS, SQL_GENERATION_MAX_TOKENS, SQL_GENERATION_STOP,
        SQL_GENERATION_TEMPERATURE,
    },
    errors::PromptError,
    providers::ai::AiProvider,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, time::Duration};
use tracing::debug;

// --- OpenAI chat-completion request and response structures ---

/// The request body sent to the chat-completions endpoint.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stop: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// --- OpenAI Provider implementation ---

/// A provider for the OpenAI chat-completions API, or any endpoint speaking
/// the same protocol.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider` with the default request timeout.
    pub fn new(api_url: String, api_key: Option<String>, model: String) -> Result<Self, PromptError> {
        Self::with_timeout(
            api_url,
            api_key,
            model,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Creates a new `OpenAiProvider` whose requests give up after `timeout`.
    pub fn with_timeout(
        api_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }

    /// The model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Builds the request body for a system prompt and a user question.
    ///
    /// The generation parameters are fixed, so identical inputs always produce
    /// an identical payload.
    pub fn build_request(&self, system_prompt: &str, user_prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: SQL_GENERATION_TEMPERATURE,
            max_tokens: SQL_GENERATION_MAX_TOKENS,
            stop: SQL_GENERATION_STOP.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    /// Sends one chat-completion request and returns the first choice's content.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        let request_body = self.build_request(system_prompt, user_prompt);
        debug!(model = %self.model, url = %self.api_url, "--> Sending chat completion request");

        let mut request_builder = self.client.post(&self.api_url);

        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(PromptError::AiRequest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PromptError::AiApi {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(PromptError::AiDeserialization)?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(PromptError::EmptyCompletion)
    }
}
