//! OpenAI-compatible chat client.
//!
//! Works with OpenAI and any endpoint exposing `/v1/chat/completions`
//! (OpenRouter, Ollama, vLLM, ...). Non-streaming only: the assistant's
//! reply is returned in one piece.
//!
//! Failure mapping:
//! - no credential → [`ChatError::MissingCredential`], before any request
//! - 401 / 403 → [`ChatError::InvalidCredential`]
//! - anything else that goes wrong → [`ChatError::Transport`]
//!
//! There is no retry; callers decide whether to try again.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use coursechat_config::AppConfig;
use coursechat_core::chat::{ChatClient, ChatRequest};
use coursechat_core::error::ChatError;
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A chat client for OpenAI-compatible completion endpoints.
pub struct OpenAiChatClient {
    base_url: String,
    credential: RwLock<Option<String>>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl OpenAiChatClient {
    /// Create a client for `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(
        base_url: impl Into<String>,
        credential: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential: RwLock::new(credential),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            client: Self::http_client(DEFAULT_TIMEOUT),
        }
    }

    /// Create an OpenAI client (convenience constructor).
    pub fn openai(credential: Option<String>, model: impl Into<String>) -> Self {
        Self::new("https://api.openai.com/v1", credential, model)
    }

    /// Build from the application config (endpoint, key, model, sampling).
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.api_url, config.api_key.clone(), &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(Some(config.max_tokens))
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Self::http_client(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The current credential, trimmed; `None` when unset or blank.
    fn credential(&self) -> Option<String> {
        let guard = self
            .credential
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
    }

    fn http_client(timeout: Duration) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
                reqwest::Client::new()
            })
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    fn set_credential(&self, credential: &str) {
        let mut guard = self
            .credential
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(credential.to_string());
        debug!("Chat credential replaced");
    }

    async fn send(&self, user_message: &str, system_prompt: &str) -> Result<String, ChatError> {
        let api_key = self.credential().ok_or(ChatError::MissingCredential)?;
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest::turn(
            &self.model,
            system_prompt,
            user_message,
            self.temperature,
            self.max_tokens,
        );

        debug!(
            model = %self.model,
            system_chars = system_prompt.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            warn!(status, "Chat endpoint rejected the credential");
            return Err(ChatError::InvalidCredential);
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Chat endpoint returned error");
            return Err(ChatError::Transport(format!("status {status}: {error_body}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Transport(format!("Failed to parse response: {e}")))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| ChatError::Transport("No choices in response".into()))
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}
