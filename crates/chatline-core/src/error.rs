//! Core domain errors.

use thiserror::Error;

/// Core domain errors for Chatline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Message has no content after trimming.
    #[error("Message is empty")]
    EmptyMessage,

    /// Message exceeds the client-side length limit.
    #[error("Message too long: {len} characters (max {max})")]
    MessageTooLong { len: usize, max: usize },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
