//! Client-side conversation state.

use tracing::debug;

use chatline_core::{timestamp, Conversation, ConversationId, Message, MessageKey, Role};

use crate::error::SessionError;
use crate::sender::{OutgoingWrite, WritePayload};

/// The conversation one view is showing, plus its optimistic messages.
///
/// Server snapshots replace the conversation wholesale; messages sent from
/// this session that a snapshot does not contain yet are re-appended so they
/// do not flicker out between send and the next successful poll.
#[derive(Debug, Clone)]
pub struct ChatSession {
    role: Role,
    conversation: Conversation,
    pending: Vec<Message>,
}

impl ChatSession {
    /// Session with no conversation bound yet.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            conversation: Conversation::empty(),
            pending: Vec::new(),
        }
    }

    pub fn with_conversation(role: Role, conversation: Conversation) -> Self {
        Self {
            role,
            conversation,
            pending: Vec::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn id(&self) -> &ConversationId {
        &self.conversation.id
    }

    /// Number of sent messages not yet seen in a snapshot.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Bind to a (newly resolved) conversation, dropping any local state.
    pub fn adopt(&mut self, conversation: Conversation) {
        debug!(conversation_id = %conversation.id, "Adopting conversation");
        self.conversation = conversation;
        self.pending.clear();
    }

    /// Compose a message and append it locally.
    ///
    /// Returns the write to deliver. The local append is not undone if the
    /// write fails.
    pub fn compose(&mut self, input: &str) -> Result<OutgoingWrite, SessionError> {
        if !self.conversation.is_resolved() {
            return Err(SessionError::NotResolved);
        }
        let message = Message::compose(self.role.sender(), input)?;

        self.conversation.append(message.clone());
        self.pending.push(message.clone());

        let payload = WritePayload::for_role(self.role, &self.conversation, &message, timestamp::now());
        Ok(OutgoingWrite {
            key: message.key(),
            payload,
        })
    }

    /// Replace local state with a server snapshot.
    ///
    /// Snapshots for another conversation are ignored. Returns whether the
    /// snapshot was applied.
    pub fn apply_snapshot(&mut self, snapshot: Conversation) -> bool {
        if snapshot.id != self.conversation.id {
            debug!(
                expected = %self.conversation.id,
                got = %snapshot.id,
                "Discarding stale snapshot"
            );
            return false;
        }

        let mut next = snapshot;
        self.pending.retain(|m| !next.contains(&m.key()));
        for message in &self.pending {
            next.append(message.clone());
        }
        self.conversation = next;
        true
    }

    /// Stop carrying a message whose write failed.
    ///
    /// The message stays visible until the next snapshot replaces state.
    pub fn write_failed(&mut self, key: &MessageKey) {
        self.pending.retain(|m| &m.key() != key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seeded_conversation, Call, FakeApi};
    use chatline_core::{CoreError, Sender};

    fn two_message_conversation(id: &str) -> Conversation {
        let mut conversation = seeded_conversation(id);
        conversation.append(Message::compose(Sender::User, "first").unwrap());
        conversation
    }

    #[tokio::test]
    async fn test_user_send_appends_and_writes_full_conversation() {
        let api = FakeApi::new();
        let conversation = two_message_conversation("c1");
        api.insert(conversation.clone());
        let mut session = ChatSession::with_conversation(Role::User, conversation);

        let write = session.compose("hello").unwrap();
        assert_eq!(session.conversation().len(), 3);

        write.deliver(&api).await.unwrap();
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Replace(body) => {
                assert_eq!(body.len(), 3);
                assert_eq!(body.messages[2].content, "hello");
                assert_eq!(body.messages[2].sender, Sender::User);
            }
            other => panic!("expected Replace, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_agent_send_writes_single_message() {
        let api = FakeApi::new();
        let conversation = two_message_conversation("c1");
        api.insert(conversation.clone());
        let mut session = ChatSession::with_conversation(Role::Agent, conversation);

        let write = session.compose("How can I help?").unwrap();
        write.deliver(&api).await.unwrap();

        match &api.calls()[0] {
            Call::Append(id, message) => {
                assert_eq!(id.as_str(), "c1");
                assert_eq!(message.sender, Sender::Agent);
            }
            other => panic!("expected Append, got {other:?}"),
        }
        assert_eq!(api.stored(&ConversationId::new("c1")).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_send_grows_by_one_even_when_write_fails() {
        let api = FakeApi::new();
        api.fail_writes(true);
        let mut session = ChatSession::with_conversation(Role::User, two_message_conversation("c1"));

        let before = session.conversation().len();
        let write = session.compose("hello").unwrap();
        assert_eq!(session.conversation().len(), before + 1);

        assert!(write.deliver(&api).await.is_err());
        session.write_failed(&write.key);
        assert_eq!(session.conversation().len(), before + 1);
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_invalid_input_leaves_state_untouched() {
        let mut session = ChatSession::with_conversation(Role::User, two_message_conversation("c1"));
        let err = session.compose("   ").unwrap_err();
        assert!(matches!(err, SessionError::Core(CoreError::EmptyMessage)));
        assert_eq!(session.conversation().len(), 2);
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_compose_requires_resolved_identity() {
        let mut session = ChatSession::new(Role::User);
        assert!(matches!(session.compose("hi"), Err(SessionError::NotResolved)));
        assert!(session.conversation().is_empty());
    }

    #[test]
    fn test_snapshot_replaces_state() {
        let mut session = ChatSession::with_conversation(Role::User, seeded_conversation("c1"));
        let snapshot = two_message_conversation("c1");

        assert!(session.apply_snapshot(snapshot.clone()));
        assert_eq!(session.conversation(), &snapshot);
    }

    #[test]
    fn test_snapshot_keeps_pending_message_until_server_has_it() {
        let server = two_message_conversation("c1");
        let mut session = ChatSession::with_conversation(Role::User, server.clone());
        session.compose("hello").unwrap();

        // Poll lands before the write: the optimistic message survives.
        assert!(session.apply_snapshot(server.clone()));
        assert_eq!(session.conversation().len(), 3);
        assert_eq!(session.conversation().messages[2].content, "hello");
        assert_eq!(session.pending_count(), 1);

        // Poll after the write: no duplicate, nothing pending.
        let mut persisted = server;
        persisted.append(session.conversation().messages[2].clone());
        session.apply_snapshot(persisted);
        assert_eq!(session.conversation().len(), 3);
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_failed_message_disappears_on_next_snapshot() {
        let server = two_message_conversation("c1");
        let mut session = ChatSession::with_conversation(Role::User, server.clone());
        let write = session.compose("lost").unwrap();
        session.write_failed(&write.key);

        session.apply_snapshot(server);
        assert_eq!(session.conversation().len(), 2);
    }

    #[test]
    fn test_stale_snapshot_is_ignored() {
        let mut session = ChatSession::with_conversation(Role::Agent, seeded_conversation("current"));
        assert!(!session.apply_snapshot(two_message_conversation("previous")));
        assert_eq!(session.id().as_str(), "current");
        assert_eq!(session.conversation().len(), 1);
    }

    #[test]
    fn test_adopt_clears_pending() {
        let mut session = ChatSession::with_conversation(Role::User, seeded_conversation("a"));
        session.compose("hi").unwrap();
        session.adopt(seeded_conversation("b"));
        assert_eq!(session.pending_count(), 0);
        assert_eq!(session.id().as_str(), "b");
    }
}
