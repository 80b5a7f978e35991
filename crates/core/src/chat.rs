//! ChatClient trait: the seam to the chat completion endpoint.
//!
//! The prompt pipeline produces a system message; a `ChatClient` sends it
//! together with the user's text and hands back the assistant's reply.
//! Implementations never retry: a failure is reported once and left to the
//! caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::message::Message;

/// Body of a chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model to use (e.g., "gpt-3.5-turbo", "gpt-4o")
    pub model: String,

    /// System prompt followed by the user message
    pub messages: Vec<Message>,

    /// Sampling temperature; kept low for structured replies
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Build the two-message request for one chat turn.
    pub fn turn(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_message: impl Into<String>,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::system(system_prompt), Message::user(user_message)],
            temperature,
            max_tokens,
        }
    }
}

/// A chat completion backend.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Whether a usable (non-blank) credential is configured.
    fn has_credential(&self) -> bool;

    /// Replace the credential used for subsequent turns, e.g. with a key
    /// the user pasted at runtime. Takes `&self` so a shared client can be
    /// updated in place.
    fn set_credential(&self, credential: &str);

    /// Send one turn and return the assistant's text.
    ///
    /// Fails with [`ChatError::MissingCredential`] before touching the
    /// network when [`has_credential`](Self::has_credential) is false.
    async fn send(&self, user_message: &str, system_prompt: &str) -> Result<String, ChatError>;
}
