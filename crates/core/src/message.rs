//! Chat message types.
//!
//! A chat turn sent to the completion endpoint is always two messages:
//! the rendered system prompt followed by the user's text.

use serde::{Deserialize, Serialize};

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (the rendered context prompt)
    System,
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

/// A single chat message, serialized in the wire shape of the
/// chat-completions API (`{"role": ..., "content": ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Which classes count for 6-3?");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Which classes count for 6-3?");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_value(Message::system("ctx")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "ctx");
    }
}
