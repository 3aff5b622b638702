//! Write requests produced by sending a message.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use chatline_client::{ChatApi, ClientError};
use chatline_core::{Conversation, ConversationId, Message, MessageKey, Role};

/// Body of the write request for one sent message.
///
/// The two roles talk to different endpoints: agents append a single
/// message, users replace the whole conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum WritePayload {
    /// `POST /chat/agent?conversation_uuid={id}` with one message.
    Append {
        conversation_id: ConversationId,
        message: Message,
    },
    /// `POST /chat/user` with the full conversation.
    Replace(Conversation),
}

impl WritePayload {
    /// Build the payload for `message`, already appended to `conversation`.
    pub fn for_role(
        role: Role,
        conversation: &Conversation,
        message: &Message,
        now: DateTime<Utc>,
    ) -> Self {
        match role {
            Role::Agent => Self::Append {
                conversation_id: conversation.id.clone(),
                message: message.clone(),
            },
            Role::User => Self::Replace(conversation.touched(now)),
        }
    }

    pub fn conversation_id(&self) -> &ConversationId {
        match self {
            Self::Append {
                conversation_id, ..
            } => conversation_id,
            Self::Replace(conversation) => &conversation.id,
        }
    }
}

/// A write waiting to be delivered.
#[derive(Debug, Clone)]
pub struct OutgoingWrite {
    /// Identity of the optimistically appended message.
    pub key: MessageKey,
    pub payload: WritePayload,
}

impl OutgoingWrite {
    /// Send the write to the backend.
    pub async fn deliver(&self, api: &dyn ChatApi) -> Result<(), ClientError> {
        let result = match &self.payload {
            WritePayload::Append {
                conversation_id,
                message,
            } => api.append_message(conversation_id, message).await.map(|_| ()),
            WritePayload::Replace(conversation) => {
                api.replace_conversation(conversation).await.map(|_| ())
            }
        };

        match &result {
            Ok(()) => debug!(conversation_id = %self.payload.conversation_id(), "Message delivered"),
            Err(e) => warn!(
                conversation_id = %self.payload.conversation_id(),
                error = %e,
                "Message delivery failed"
            ),
        }
        result
    }
}
