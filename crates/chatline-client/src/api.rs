//! Backend contract as seen by the client.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use chatline_core::{Conversation, ConversationId, Message};

use crate::error::ClientError;

/// Response of the agent append endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub reply: String,
}

/// Operations of the chat backend.
///
/// Implemented over HTTP by [`crate::HttpClient`]; session logic only sees
/// this trait so it can run against an in-memory fake.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Create a conversation with a fresh id.
    async fn create_conversation(&self) -> Result<Conversation, ClientError>;

    /// Fetch one conversation. Unknown ids yield [`ClientError::NotFound`].
    async fn get_conversation(&self, id: &ConversationId) -> Result<Conversation, ClientError>;

    /// Fetch every conversation keyed by id.
    async fn list_conversations(&self) -> Result<HashMap<String, Conversation>, ClientError>;

    /// Persist a whole conversation (user role).
    async fn replace_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, ClientError>;

    /// Append one message to a conversation (agent role).
    async fn append_message(
        &self,
        id: &ConversationId,
        message: &Message,
    ) -> Result<AgentReply, ClientError>;
}
