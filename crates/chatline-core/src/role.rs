//! Client roles.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::message::Sender;

/// Which side of the conversation this client acts for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// End-user; identity comes from the persisted store.
    #[default]
    User,
    /// Support agent; identity comes from navigation.
    Agent,
}

impl Role {
    /// Sender tag stamped on messages composed in this role.
    pub fn sender(&self) -> Sender {
        match self {
            Self::User => Sender::User,
            Self::Agent => Sender::Agent,
        }
    }

    /// Whether a message from `sender` was written by this side.
    pub fn is_outgoing(&self, sender: Sender) -> bool {
        self.sender() == sender
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Agent => "Agent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "agent" => Ok(Self::Agent),
            other => Err(CoreError::InvalidInput(format!(
                "unknown role '{other}' (expected 'user' or 'agent')"
            ))),
        }
    }
}
