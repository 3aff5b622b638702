//! Identity resolution: which conversation a session is bound to.

use tracing::{info, warn};

use chatline_client::ChatApi;
use chatline_core::{Conversation, ConversationId, Role};

use crate::error::SessionError;
use crate::store::{IdStore, CONVERSATION_KEY};

/// What to do when the candidate id does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryPolicy {
    /// Forget the id and start a new conversation.
    Recreate,
    /// Report [`SessionError::InvalidIdentity`] to the caller.
    Fail,
}

impl From<Role> for RecoveryPolicy {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::Recreate,
            Role::Agent => Self::Fail,
        }
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub conversation: Conversation,
    /// Whether a new conversation had to be created.
    pub created: bool,
}

/// Binds a session to a conversation, once per view mount.
pub struct IdentityResolver<'a> {
    api: &'a dyn ChatApi,
    store: Option<&'a dyn IdStore>,
    policy: RecoveryPolicy,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(api: &'a dyn ChatApi, store: Option<&'a dyn IdStore>, policy: RecoveryPolicy) -> Self {
        Self { api, store, policy }
    }

    /// User role: consults and maintains the persisted id, recreates on failure.
    pub fn for_user(api: &'a dyn ChatApi, store: &'a dyn IdStore) -> Self {
        Self::new(api, Some(store), RecoveryPolicy::Recreate)
    }

    /// Agent role: id comes from navigation, failures are reported.
    pub fn for_agent(api: &'a dyn ChatApi) -> Self {
        Self::new(api, None, RecoveryPolicy::Fail)
    }

    /// Resolve `supplied`, falling back to the persisted id.
    pub async fn resolve(&self, supplied: Option<ConversationId>) -> Result<Resolution, SessionError> {
        let candidate = supplied
            .filter(|id| !id.is_empty())
            .or_else(|| self.stored_id());

        match candidate {
            Some(id) => match self.api.get_conversation(&id).await {
                Ok(conversation) => {
                    info!(conversation_id = %conversation.id, "Resumed conversation");
                    Ok(Resolution {
                        conversation,
                        created: false,
                    })
                }
                Err(e) => {
                    warn!(conversation_id = %id, error = %e, "Conversation id did not resolve");
                    match self.policy {
                        RecoveryPolicy::Fail => Err(SessionError::InvalidIdentity {
                            id,
                            reason: e.to_string(),
                        }),
                        RecoveryPolicy::Recreate => {
                            self.forget();
                            self.create().await
                        }
                    }
                }
            },
            None => match self.policy {
                RecoveryPolicy::Fail => Err(SessionError::InvalidIdentity {
                    id: ConversationId::default(),
                    reason: "no conversation id given".to_string(),
                }),
                RecoveryPolicy::Recreate => self.create().await,
            },
        }
    }

    async fn create(&self) -> Result<Resolution, SessionError> {
        let conversation = self.api.create_conversation().await?;
        info!(conversation_id = %conversation.id, "Created conversation");

        if let Some(store) = self.store {
            if let Err(e) = store.set(CONVERSATION_KEY, conversation.id.as_str()) {
                warn!(error = %e, "Failed to persist conversation id");
            }
        }

        Ok(Resolution {
            conversation,
            created: true,
        })
    }

    fn stored_id(&self) -> Option<ConversationId> {
        let store = self.store?;
        match store.get(CONVERSATION_KEY) {
            Ok(raw) => ConversationId::from_optional(raw.as_deref()),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted conversation id");
                None
            }
        }
    }

    fn forget(&self) {
        if let Some(store) = self.store {
            if let Err(e) = store.remove(CONVERSATION_KEY) {
                warn!(error = %e, "Failed to remove persisted conversation id");
            }
        }
    }
}
