//! Session errors.

use thiserror::Error;

use chatline_client::ClientError;
use chatline_core::{ConversationId, CoreError};

/// Errors from the persisted id store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the state file failed.
    #[error("state file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state file is not valid JSON.
    #[error("state file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The conversation id does not resolve to a conversation.
    #[error("Conversation '{id}' is not available: {reason}")]
    InvalidIdentity { id: ConversationId, reason: String },

    /// An operation needed a resolved conversation.
    #[error("No conversation is open yet")]
    NotResolved,

    /// Backend request failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Input failed validation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persisted store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Text suitable for a blocking user-facing alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidIdentity { id, .. } if id.is_empty() => {
                "No conversation was selected.".to_string()
            }
            Self::InvalidIdentity { id, .. } => {
                format!("Conversation {} was not found.", id)
            }
            Self::Client(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
