//! Background task that owns the chat session.
//!
//! Runs in a separate thread with its own tokio runtime. All session state
//! lives here; the UI only sees snapshots sent over `ui_tx`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use chatline_client::{ChatApi, ClientError};
use chatline_core::{Conversation, ConversationId, MessageKey, Role};
use chatline_session::{
    fetch_dashboard, poll_once, ChatSession, IdStore, IdentityResolver, PollHandle,
};

use crate::event::{BackendCommand, ConnectionState, UiEvent};

/// Result of a spawned write, reported back to the loop.
struct WriteOutcome {
    key: MessageKey,
    result: Result<(), ClientError>,
}

pub struct Backend {
    api: Arc<dyn ChatApi>,
    /// Persisted id store; only the user role has one.
    store: Option<Arc<dyn IdStore>>,
    session: ChatSession,
    poller: Option<PollHandle>,
    refresh: Duration,
    connection: ConnectionState,
    ui_tx: mpsc::Sender<UiEvent>,
    snapshot_tx: mpsc::Sender<Conversation>,
    snapshot_rx: mpsc::Receiver<Conversation>,
    write_tx: mpsc::Sender<WriteOutcome>,
    write_rx: mpsc::Receiver<WriteOutcome>,
}

impl Backend {
    pub fn new(
        api: Arc<dyn ChatApi>,
        store: Option<Arc<dyn IdStore>>,
        role: Role,
        refresh: Duration,
        ui_tx: mpsc::Sender<UiEvent>,
    ) -> Self {
        let (snapshot_tx, snapshot_rx) = mpsc::channel(16);
        let (write_tx, write_rx) = mpsc::channel(16);
        Self {
            api,
            store,
            session: ChatSession::new(role),
            poller: None,
            refresh,
            connection: ConnectionState::Connecting,
            ui_tx,
            snapshot_tx,
            snapshot_rx,
            write_tx,
            write_rx,
        }
    }

    /// Run until the UI quits or `shutdown` fires.
    ///
    /// `initial` opens a conversation straight away in agent mode. Cancelling
    /// `shutdown` abandons any request still in flight.
    pub async fn run(
        mut self,
        cmd_rx: mpsc::Receiver<BackendCommand>,
        initial: Option<ConversationId>,
        shutdown: CancellationToken,
    ) {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown requested, abandoning in-flight requests");
            }
            _ = self.serve(cmd_rx, initial) => {}
        }

        self.close();
        info!("Backend shutdown complete");
    }

    async fn serve(
        &mut self,
        mut cmd_rx: mpsc::Receiver<BackendCommand>,
        initial: Option<ConversationId>,
    ) {
        let role = self.session.role();
        info!(role = %role, "Backend starting");

        match role {
            Role::User => self.resolve(None).await,
            Role::Agent => {
                self.refresh_dashboard().await;
                if let Some(id) = initial {
                    self.resolve(Some(id)).await;
                }
            }
        }

        // Dashboard listing follows the same period as the chat poller.
        let mut dashboard = tokio::time::interval_at(Instant::now() + self.refresh, self.refresh);
        dashboard.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let watch_dashboard = role == Role::Agent;

        loop {
            tokio::select! {
                _ = dashboard.tick(), if watch_dashboard => {
                    debug!("Dashboard tick");
                    self.refresh_dashboard().await;
                }

                Some(snapshot) = self.snapshot_rx.recv() => {
                    self.apply_snapshot(snapshot).await;
                }

                Some(outcome) = self.write_rx.recv() => {
                    self.finish_write(outcome).await;
                }

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(BackendCommand::Quit) | None => {
                            info!("Received quit command, shutting down backend");
                            break;
                        }
                        Some(cmd) => self.handle_command(cmd).await,
                    }
                }
            }
        }
    }

    async fn handle_command(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::Send(text) => self.send(&text).await,
            BackendCommand::Open(id) => self.resolve(Some(id)).await,
            BackendCommand::Close => {
                self.close();
                self.refresh_dashboard().await;
            }
            BackendCommand::Refresh => self.refresh().await,
            BackendCommand::Quit => {}
        }
    }

    /// Bind the session to a conversation using the role's recovery policy.
    async fn resolve(&mut self, supplied: Option<ConversationId>) {
        let role = self.session.role();
        let result = IdentityResolver::new(self.api.as_ref(), self.store.as_deref(), role.into())
            .resolve(supplied)
            .await;

        match result {
            Ok(resolution) => {
                info!(
                    conversation_id = %resolution.conversation.id,
                    created = resolution.created,
                    "Conversation resolved"
                );
                self.bind(resolution.conversation).await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to resolve conversation");
                self.close();
                self.alert(e.user_message()).await;
                if role == Role::Agent {
                    self.emit(UiEvent::ConversationClosed).await;
                } else {
                    self.set_connection(ConnectionState::Disconnected).await;
                }
            }
        }
    }

    /// Adopt `conversation` and point the poller at it.
    async fn bind(&mut self, conversation: Conversation) {
        let id = conversation.id.clone();
        self.session.adopt(conversation);

        if let Some(poller) = self.poller.as_mut() {
            poller.rebind(id);
        } else {
            self.poller = Some(PollHandle::spawn(
                self.api.clone(),
                id,
                self.refresh,
                self.snapshot_tx.clone(),
            ));
        }

        self.set_connection(ConnectionState::Connected).await;
        self.emit(UiEvent::ConversationOpened(self.session.conversation().clone()))
            .await;
    }

    /// Stop polling and forget the open conversation.
    fn close(&mut self) {
        if let Some(poller) = self.poller.take() {
            debug!(conversation_id = %poller.id(), "Stopping poller");
            poller.cancel();
        }
        self.session = ChatSession::new(self.session.role());
    }

    async fn send(&mut self, text: &str) {
        let write = match self.session.compose(text) {
            Ok(write) => write,
            Err(e) => {
                self.alert(e.user_message()).await;
                return;
            }
        };

        self.emit(UiEvent::ConversationUpdated(self.session.conversation().clone()))
            .await;

        let api = self.api.clone();
        let tx = self.write_tx.clone();
        tokio::spawn(async move {
            let result = write.deliver(api.as_ref()).await;
            let _ = tx
                .send(WriteOutcome {
                    key: write.key,
                    result,
                })
                .await;
        });
    }

    async fn finish_write(&mut self, outcome: WriteOutcome) {
        match outcome.result {
            Ok(()) => self.set_connection(ConnectionState::Connected).await,
            Err(e) => {
                self.session.write_failed(&outcome.key);
                self.alert(e.user_message()).await;
            }
        }
    }

    async fn apply_snapshot(&mut self, snapshot: Conversation) {
        if self.session.apply_snapshot(snapshot) {
            self.set_connection(ConnectionState::Connected).await;
            self.emit(UiEvent::ConversationUpdated(self.session.conversation().clone()))
                .await;
        }
    }

    /// Manual refresh: retry resolution, re-fetch the open conversation and
    /// the dashboard.
    async fn refresh(&mut self) {
        let role = self.session.role();
        if role == Role::User && !self.session.conversation().is_resolved() {
            self.resolve(None).await;
            return;
        }

        match poll_once(self.api.as_ref(), self.session.id()).await {
            Ok(Some(snapshot)) => self.apply_snapshot(snapshot).await,
            Ok(None) => {}
            Err(e) => self.report(e).await,
        }

        if role == Role::Agent {
            self.refresh_dashboard().await;
        }
    }

    async fn refresh_dashboard(&mut self) {
        match fetch_dashboard(self.api.as_ref()).await {
            Ok(summaries) => {
                debug!(count = summaries.len(), "Fetched conversations");
                self.set_connection(ConnectionState::Connected).await;
                self.emit(UiEvent::DashboardUpdated(summaries)).await;
            }
            Err(e) => self.report(e).await,
        }
    }

    /// Non-blocking failure: status line only.
    async fn report(&mut self, error: ClientError) {
        warn!(error = %error, "Request failed");
        self.set_connection(ConnectionState::Disconnected).await;
        self.emit(UiEvent::Error(error.user_message())).await;
    }

    async fn alert(&self, message: String) {
        self.emit(UiEvent::Alert(message)).await;
    }

    async fn set_connection(&mut self, state: ConnectionState) {
        if self.connection != state {
            self.connection = state;
            self.emit(UiEvent::ConnectionStateChanged(state)).await;
        }
    }

    async fn emit(&self, event: UiEvent) {
        let _ = self.ui_tx.send(event).await;
    }
}
