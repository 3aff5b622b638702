//! UI state for rendering.

use chatline_core::{Conversation, ConversationSummary, Role, MAX_MESSAGE_CHARS};
use chatline_tui_components::{ChatLine, ComposerState, Direction};

use crate::event::ConnectionState;

/// Available views in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The user's own conversation.
    UserChat,
    /// Agent listing of every conversation.
    Dashboard,
    /// One conversation opened from the dashboard.
    AgentChat,
}

/// Snapshot of data for rendering (no async, no locks).
pub struct UiState {
    /// Which side of the chat this client plays.
    pub role: Role,

    /// Current view.
    pub view: View,

    /// Conversation shown in the chat views.
    pub conversation: Conversation,

    /// Dashboard rows, most recently updated first.
    pub conversations: Vec<ConversationSummary>,

    /// Selected dashboard row.
    pub selected: usize,

    /// Message being typed.
    pub composer: ComposerState,

    /// Blocking notice; input is ignored until dismissed.
    pub alert: Option<String>,

    pub connection_state: ConnectionState,

    /// Status message to display in footer.
    pub status_message: Option<String>,

    /// Last non-blocking error (if any).
    pub last_error: Option<String>,
}

impl UiState {
    pub fn new(role: Role) -> Self {
        let view = match role {
            Role::User => View::UserChat,
            Role::Agent => View::Dashboard,
        };
        Self {
            role,
            view,
            conversation: Conversation::empty(),
            conversations: Vec::new(),
            selected: 0,
            composer: ComposerState::new(MAX_MESSAGE_CHARS),
            alert: None,
            connection_state: ConnectionState::default(),
            status_message: None,
            last_error: None,
        }
    }

    pub fn is_chat_view(&self) -> bool {
        matches!(self.view, View::UserChat | View::AgentChat)
    }

    /// Sending is only possible once a conversation is bound.
    pub fn can_send(&self) -> bool {
        self.is_chat_view() && self.conversation.is_resolved()
    }

    pub fn selected_summary(&self) -> Option<&ConversationSummary> {
        self.conversations.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.conversations.is_empty() {
            self.selected = (self.selected + 1).min(self.conversations.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Replace dashboard rows, keeping the selection on the same conversation
    /// when it is still listed.
    pub fn set_conversations(&mut self, conversations: Vec<ConversationSummary>) {
        let current = self.selected_summary().map(|s| s.id.clone());
        self.conversations = conversations;
        self.selected = current
            .and_then(|id| self.conversations.iter().position(|s| s.id == id))
            .unwrap_or(0)
            .min(self.conversations.len().saturating_sub(1));
    }

    /// Messages of the open conversation, labelled from this role's point of view.
    pub fn chat_lines(&self) -> Vec<ChatLine> {
        let other = match self.role {
            Role::User => Role::Agent,
            Role::Agent => Role::User,
        };
        self.conversation
            .messages
            .iter()
            .map(|m| {
                let outgoing = self.role.is_outgoing(m.sender);
                ChatLine {
                    author: if outgoing { "You".to_string() } else { other.name().to_string() },
                    content: m.content.clone(),
                    timestamp: m.timestamp,
                    direction: if outgoing { Direction::Outgoing } else { Direction::Incoming },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_core::{timestamp, ConversationId, Message, Sender};

    fn summary(id: &str) -> ConversationSummary {
        ConversationSummary {
            id: ConversationId::new(id),
            updated_at: timestamp::now(),
            message_count: 0,
            last_sender: None,
            preview: None,
        }
    }

    #[test]
    fn test_initial_view_follows_role() {
        assert_eq!(UiState::new(Role::User).view, View::UserChat);
        assert_eq!(UiState::new(Role::Agent).view, View::Dashboard);
    }

    #[test]
    fn test_cannot_send_before_resolution() {
        let mut state = UiState::new(Role::User);
        assert!(!state.can_send());

        state.conversation = Conversation::empty().with_id(ConversationId::new("abc"));
        assert!(state.can_send());
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut state = UiState::new(Role::Agent);
        state.select_next();
        assert_eq!(state.selected, 0);

        state.set_conversations(vec![summary("a"), summary("b")]);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
        state.select_prev();
        state.select_prev();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_selection_follows_conversation_across_refresh() {
        let mut state = UiState::new(Role::Agent);
        state.set_conversations(vec![summary("a"), summary("b")]);
        state.select_next();

        // "c" became the most recent; "b" moves down.
        state.set_conversations(vec![summary("c"), summary("a"), summary("b")]);
        assert_eq!(state.selected_summary().map(|s| s.id.as_str()), Some("b"));

        state.set_conversations(vec![summary("c")]);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_chat_lines_label_sides() {
        let mut state = UiState::new(Role::User);
        let mut conversation = Conversation::empty().with_id(ConversationId::new("abc"));
        conversation.append(Message::new(Sender::Agent, "Hello!", timestamp::now()));
        conversation.append(Message::new(Sender::User, "hi", timestamp::now()));
        state.conversation = conversation;

        let lines = state.chat_lines();
        assert_eq!(lines[0].author, "Agent");
        assert_eq!(lines[0].direction, Direction::Incoming);
        assert_eq!(lines[1].author, "You");
        assert_eq!(lines[1].direction, Direction::Outgoing);

        state.role = Role::Agent;
        let lines = state.chat_lines();
        assert_eq!(lines[0].author, "You");
        assert_eq!(lines[1].author, "User");
    }
}
