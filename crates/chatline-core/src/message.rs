//! Chat message types for conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::timestamp;

/// Maximum number of characters the client accepts in one message.
pub const MAX_MESSAGE_CHARS: usize = 200;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The end-user who opened the conversation.
    User,
    /// The support agent assigned to the conversation.
    Agent,
}

impl Sender {
    /// Wire name of this sender.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in the conversation history.
///
/// Messages carry no id; two messages are the same if sender, timestamp and
/// content all match (see [`MessageKey`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message content.
    pub content: String,
    /// Who wrote the message.
    pub sender: Sender,
    /// When the message was composed.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message with an explicit timestamp.
    pub fn new(sender: Sender, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            sender,
            timestamp,
        }
    }

    /// Compose a message from raw user input, stamped with the current time.
    ///
    /// Input is trimmed; empty input and input longer than
    /// [`MAX_MESSAGE_CHARS`] are rejected.
    pub fn compose(sender: Sender, input: &str) -> Result<Self, CoreError> {
        let content = input.trim();
        if content.is_empty() {
            return Err(CoreError::EmptyMessage);
        }
        let len = content.chars().count();
        if len > MAX_MESSAGE_CHARS {
            return Err(CoreError::MessageTooLong {
                len,
                max: MAX_MESSAGE_CHARS,
            });
        }
        Ok(Self::new(sender, content, timestamp::now()))
    }

    /// Identity key used to match an optimistic message against server state.
    pub fn key(&self) -> MessageKey {
        MessageKey {
            sender: self.sender,
            timestamp_ms: self.timestamp.timestamp_millis(),
            content: self.content.clone(),
        }
    }
}

/// Content identity of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    pub sender: Sender,
    pub timestamp_ms: i64,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_trims_and_tags_sender() {
        let msg = Message::compose(Sender::User, "  hello  ").unwrap();
        assert_eq!(msg.content, "hello");
        assert_eq!(msg.sender, Sender::User);
    }

    #[test]
    fn test_compose_rejects_empty() {
        assert_eq!(
            Message::compose(Sender::Agent, "   ").unwrap_err(),
            CoreError::EmptyMessage
        );
    }

    #[test]
    fn test_compose_length_limit_counts_chars() {
        let at_limit = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(Message::compose(Sender::User, &at_limit).is_ok());

        let over = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert_eq!(
            Message::compose(Sender::User, &over).unwrap_err(),
            CoreError::MessageTooLong {
                len: MAX_MESSAGE_CHARS + 1,
                max: MAX_MESSAGE_CHARS
            }
        );
    }

    #[test]
    fn test_wire_format() {
        let ts = timestamp::parse("2024-05-01T10:00:00.123Z").unwrap();
        let msg = Message::new(Sender::Agent, "Hi", ts);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "agent");
        assert_eq!(json["content"], "Hi");
        assert_eq!(json["timestamp"], "2024-05-01T10:00:00.123Z");
    }

    #[test]
    fn test_reads_backend_message() {
        let msg: Message = serde_json::from_str(
            r#"{"sender":"user","content":"hey","timestamp":"2024-05-01T10:00:00.123000"}"#,
        )
        .unwrap();
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.timestamp.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_key_survives_wire_precision() {
        let sent = Message::compose(Sender::User, "hello").unwrap();
        let wire = serde_json::to_string(&sent).unwrap();
        let echoed: Message = serde_json::from_str(&wire).unwrap();
        assert_eq!(sent.key(), echoed.key());
    }
}
