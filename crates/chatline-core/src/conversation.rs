//! Conversation type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ConversationId;
use crate::message::{Message, MessageKey};
use crate::timestamp;

/// Ordered exchange between one user and one agent.
///
/// `messages` is chronological. The client only appends to it or replaces
/// the whole conversation with a server snapshot; it never reorders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Backend-issued identifier.
    #[serde(rename = "conversation_uuid")]
    pub id: ConversationId,

    /// Reference to the agent assigned to this conversation.
    pub agent_id: i64,

    /// Message history, oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// When the conversation was created.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    /// When the conversation was last written.
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Placeholder used before identity resolution.
    pub fn empty() -> Self {
        Self {
            id: ConversationId::default(),
            agent_id: -1,
            messages: Vec::new(),
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: ConversationId) -> Self {
        self.id = id;
        self
    }

    /// Whether this conversation is bound to a backend id.
    pub fn is_resolved(&self) -> bool {
        !self.id.is_empty()
    }

    /// Append a message at the end of the history.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Whether the history holds a message with the given identity.
    pub fn contains(&self, key: &MessageKey) -> bool {
        self.messages.iter().any(|m| &m.key() == key)
    }

    /// Copy of this conversation stamped with a new `updated_at`, as sent on
    /// full-replace writes.
    pub fn touched(&self, updated_at: DateTime<Utc>) -> Self {
        Self {
            updated_at,
            ..self.clone()
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::empty()
    }
}
