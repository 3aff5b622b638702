//! Chatline Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Persistent storage
//! - Runtime specifics
//!
//! All types here describe a support conversation between one user and one
//! agent, as exchanged with the chat backend.

pub mod conversation;
pub mod error;
pub mod ids;
pub mod message;
pub mod role;
pub mod summary;
pub mod timestamp;

// Re-export commonly used types
pub use conversation::Conversation;
pub use error::CoreError;
pub use ids::ConversationId;
pub use message::{Message, MessageKey, Sender, MAX_MESSAGE_CHARS};
pub use role::Role;
pub use summary::{sort_by_recent, ConversationSummary};
