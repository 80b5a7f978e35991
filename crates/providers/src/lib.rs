//! Chat completion clients for coursechat.
//!
//! All clients implement the `coursechat_core::ChatClient` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiChatClient;
