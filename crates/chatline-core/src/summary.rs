//! Dashboard listing of conversations.

use chrono::{DateTime, Utc};

use crate::conversation::Conversation;
use crate::ids::ConversationId;
use crate::message::Sender;

/// Longest preview shown before truncation.
pub const PREVIEW_CHARS: usize = 50;

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
    pub last_sender: Option<Sender>,
    pub preview: Option<String>,
}

impl ConversationSummary {
    pub fn from_conversation(conversation: &Conversation) -> Self {
        let last = conversation.last_message();
        Self {
            id: conversation.id.clone(),
            updated_at: conversation.updated_at,
            message_count: conversation.len(),
            last_sender: last.map(|m| m.sender),
            preview: last.map(|m| preview(&m.content)),
        }
    }
}

/// Shorten message content for a one-line preview.
pub fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let head: String = content.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Order conversations most recently updated first.
///
/// Ties are broken by id so the listing does not jump between refreshes.
pub fn sort_by_recent(conversations: impl IntoIterator<Item = Conversation>) -> Vec<Conversation> {
    let mut list: Vec<Conversation> = conversations.into_iter().collect();
    list.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    list
}
