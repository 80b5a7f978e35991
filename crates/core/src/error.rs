//! Error types for the coursechat domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Corpus failures are
//! degraded to empty text by the store and never reach the end user; chat
//! failures do, through [`ChatError::user_message`].

use thiserror::Error;

/// Failure to fetch one requirements corpus.
#[derive(Debug, Clone, Error)]
pub enum CorpusError {
    #[error("Failed to read corpus at {locator}: {reason}")]
    Read { locator: String, reason: String },

    #[error("Corpus request to {locator} returned status {status}")]
    Http { locator: String, status: u16 },

    #[error("Network error fetching corpus at {locator}: {reason}")]
    Network { locator: String, reason: String },
}

/// Failures surfaced by a [`ChatClient`](crate::chat::ChatClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// No credential configured; detected before any request is sent.
    #[error("No API credential configured")]
    MissingCredential,

    /// The endpoint rejected the credential (401/403).
    #[error("API credential rejected by the endpoint")]
    InvalidCredential,

    /// Anything else: network, unexpected status, malformed response.
    #[error("Chat transport failure: {0}")]
    Transport(String),
}

impl ChatError {
    /// The fixed, human-readable text shown to the end user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingCredential => "API key not set. Please set your API key first.",
            Self::InvalidCredential => "Invalid API key. Please check your API key.",
            Self::Transport(_) => "Failed to get a response from the AI. Please try again later.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_error_displays_locator() {
        let err = CorpusError::Http {
            locator: "https://example.edu/reqs.txt".into(),
            status: 404,
        };
        assert!(err.to_string().contains("example.edu"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn chat_errors_map_to_three_fixed_messages() {
        let missing = ChatError::MissingCredential.user_message();
        let invalid = ChatError::InvalidCredential.user_message();
        let transport = ChatError::Transport("connection reset".into()).user_message();

        assert!(missing.contains("not set"));
        assert!(invalid.contains("Invalid"));
        assert!(transport.contains("try again later"));
        assert_ne!(missing, invalid);
        assert_ne!(invalid, transport);
    }

    #[test]
    fn transport_detail_stays_out_of_user_message() {
        let err = ChatError::Transport("status 500: upstream exploded".into());
        assert!(err.to_string().contains("upstream exploded"));
        assert!(!err.user_message().contains("upstream"));
    }
}
