//! Event types for communication between the backend and the UI.

use chatline_core::{Conversation, ConversationId, ConversationSummary};

/// Connection state for the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No request has completed yet.
    #[default]
    Connecting,

    /// The last request reached the backend.
    Connected,

    /// The last request failed to reach the backend.
    Disconnected,
}

/// Events sent from the backend to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    /// A conversation was resolved; switch to the chat view.
    ConversationOpened(Conversation),

    /// The open conversation changed (local send or poll snapshot).
    ConversationUpdated(Conversation),

    /// The open conversation was closed; go back to the dashboard.
    ConversationClosed,

    /// Dashboard listing was refreshed.
    DashboardUpdated(Vec<ConversationSummary>),

    /// Something the user must acknowledge.
    Alert(String),

    /// Non-blocking error for the status line.
    Error(String),

    /// Connection state changed.
    ConnectionStateChanged(ConnectionState),
}

/// Commands sent from the UI to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Compose and deliver a message in the open conversation.
    Send(String),

    /// Open a conversation from the dashboard.
    Open(ConversationId),

    /// Close the open conversation.
    Close,

    /// Refresh now instead of waiting for the next tick.
    Refresh,

    /// Quit the application.
    Quit,
}
