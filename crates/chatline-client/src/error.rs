//! Error types for the chat client.

use thiserror::Error;

/// Errors that can occur when talking to the chat backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to build the client or reach the backend.
    #[error("connection failed: {0}")]
    Connection(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend refused the request.
    #[error("{detail} (HTTP {status})")]
    Rejected { status: u16, detail: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Whether the backend reported the resource as unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Text suitable for a user-facing alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { detail, .. } if !detail.is_empty() => detail.clone(),
            Self::Http(e) if e.is_connect() || e.is_timeout() => {
                "The chat service is unreachable. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }
}
