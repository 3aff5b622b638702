//! Conversation session logic shared by the Chatline front-ends.
//!
//! - `resolver` - binds a session to a conversation id
//! - `poller` - periodic re-fetch of the bound conversation
//! - `session` / `sender` - optimistic send and the write it produces
//! - `store` - persisted conversation id
//! - `dashboard` - agent listing of all conversations

pub mod dashboard;
pub mod error;
pub mod poller;
pub mod resolver;
pub mod sender;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

pub use dashboard::fetch_dashboard;
pub use error::{SessionError, StoreError};
pub use poller::{poll_once, PollHandle, DEFAULT_POLL_INTERVAL};
pub use resolver::{IdentityResolver, RecoveryPolicy, Resolution};
pub use sender::{OutgoingWrite, WritePayload};
pub use session::ChatSession;
pub use store::{FileIdStore, IdStore, MemoryIdStore, CONVERSATION_KEY};
