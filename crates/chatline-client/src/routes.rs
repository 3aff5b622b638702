//! Route table of the chat backend.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use chatline_core::ConversationId;

/// Characters kept verbatim in ids placed in paths and queries.
const ID_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Builds absolute URLs for every backend endpoint.
#[derive(Debug, Clone)]
pub struct Routes {
    host: String,
    api: String,
}

impl Routes {
    /// Create a route table for `base_url` with the API under `prefix`.
    pub fn new(base_url: &str, prefix: &str) -> Self {
        let host = base_url.trim_end_matches('/').to_string();
        let prefix = prefix.trim_matches('/');
        let api = if prefix.is_empty() {
            host.clone()
        } else {
            format!("{}/{}", host, prefix)
        };
        Self { host, api }
    }

    /// Health check at the server root.
    pub fn root(&self) -> String {
        format!("{}/", self.host)
    }

    /// `POST` creates, `GET` lists all conversations.
    pub fn conversations(&self) -> String {
        format!("{}/conversation", self.api)
    }

    /// A single conversation.
    pub fn conversation(&self, id: &ConversationId) -> String {
        format!("{}/conversation/{}", self.api, encode(id))
    }

    /// Full-replace write used by the user role.
    pub fn chat_user(&self) -> String {
        format!("{}/chat/user", self.api)
    }

    /// Append write used by the agent role.
    pub fn chat_agent(&self, id: &ConversationId) -> String {
        format!("{}/chat/agent?conversation_uuid={}", self.api, encode(id))
    }
}

fn encode(id: &ConversationId) -> String {
    utf8_percent_encode(id.as_str(), ID_ENCODE_SET).to_string()
}
