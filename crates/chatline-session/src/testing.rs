//! In-memory fakes for session tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use chatline_client::{AgentReply, ChatApi, ClientError};
use chatline_core::{timestamp, Conversation, ConversationId, Message, Sender};

use crate::error::StoreError;
use crate::store::{IdStore, MemoryIdStore};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create,
    Get(ConversationId),
    List,
    Replace(Conversation),
    Append(ConversationId, Message),
}

#[derive(Default)]
struct FakeState {
    conversations: HashMap<String, Conversation>,
    calls: Vec<Call>,
    fail_writes: bool,
    unreachable: bool,
}

/// Backend fake that records every call.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, conversation: Conversation) {
        self.state
            .lock()
            .unwrap()
            .conversations
            .insert(conversation.id.as_str().to_string(), conversation);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn unreachable(&self, down: bool) {
        self.state.lock().unwrap().unreachable = down;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn creates(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Create)).count()
    }

    pub fn gets(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Get(_))).count()
    }

    pub fn stored(&self, id: &ConversationId) -> Option<Conversation> {
        self.state.lock().unwrap().conversations.get(id.as_str()).cloned()
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.unreachable {
            return Err(ClientError::Connection("backend down".to_string()));
        }
        Ok(())
    }
}

/// Conversation seeded the way the backend creates one.
pub fn seeded_conversation(id: &str) -> Conversation {
    let now = timestamp::now();
    let mut conversation = Conversation::empty().with_id(ConversationId::new(id));
    conversation.agent_id = 3;
    conversation.created_at = now;
    conversation.updated_at = now;
    conversation.append(Message::new(
        Sender::Agent,
        "Hello! How can I help you today?",
        now,
    ));
    conversation
}

#[async_trait]
impl ChatApi for FakeApi {
    async fn create_conversation(&self) -> Result<Conversation, ClientError> {
        self.record(Call::Create)?;
        let conversation = seeded_conversation(ConversationId::generate().as_str());
        self.insert(conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(&self, id: &ConversationId) -> Result<Conversation, ClientError> {
        self.record(Call::Get(id.clone()))?;
        self.stored(id)
            .ok_or_else(|| ClientError::NotFound(format!("conversation {}", id)))
    }

    async fn list_conversations(&self) -> Result<HashMap<String, Conversation>, ClientError> {
        self.record(Call::List)?;
        Ok(self.state.lock().unwrap().conversations.clone())
    }

    async fn replace_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, ClientError> {
        self.record(Call::Replace(conversation.clone()))?;
        if self.state.lock().unwrap().fail_writes {
            return Err(ClientError::Rejected {
                status: 400,
                detail: "write refused".to_string(),
            });
        }
        self.insert(conversation.clone());
        Ok(conversation.clone())
    }

    async fn append_message(
        &self,
        id: &ConversationId,
        message: &Message,
    ) -> Result<AgentReply, ClientError> {
        self.record(Call::Append(id.clone(), message.clone()))?;
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(ClientError::Rejected {
                status: 400,
                detail: "write refused".to_string(),
            });
        }
        let conversation = state
            .conversations
            .get_mut(id.as_str())
            .ok_or_else(|| ClientError::NotFound(format!("conversation {}", id)))?;
        conversation.append(message.clone());
        Ok(AgentReply {
            reply: message.content.clone(),
        })
    }
}

/// A store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Get(String),
    Set(String, String),
    Remove(String),
}

/// Memory store that records operations.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryIdStore,
    ops: Mutex<Vec<StoreOp>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.inner.set(key, value).unwrap();
        store
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<StoreOp> {
        self.ops()
            .into_iter()
            .filter(|op| !matches!(op, StoreOp::Get(_)))
            .collect()
    }
}

impl IdStore for RecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.ops.lock().unwrap().push(StoreOp::Get(key.to_string()));
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.ops
            .lock()
            .unwrap()
            .push(StoreOp::Set(key.to_string(), value.to_string()));
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.ops.lock().unwrap().push(StoreOp::Remove(key.to_string()));
        self.inner.remove(key)
    }
}
