//! # coursechat core
//!
//! Domain types, traits, and error definitions shared by the coursechat
//! crates. Nothing here performs I/O: the corpus loader, the context
//! pipeline and the chat transport all live in their own crates and
//! depend inward on this one.
//!
//! ## Contents
//!
//! - [`selection`] — the caller's per-turn state (subjects + programs)
//! - [`message`] — chat messages exchanged with the completion endpoint
//! - [`chat`] — the `ChatClient` seam and its request shape
//! - [`error`] — corpus and chat failure taxonomies

pub mod chat;
pub mod error;
pub mod message;
pub mod selection;

// Re-export key types at crate root for ergonomics
pub use chat::{ChatClient, ChatRequest};
pub use error::{ChatError, CorpusError};
pub use message::{Message, Role};
pub use selection::{ProgramId, SelectionContext};
