//! Application state and main event loop.

use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use chatline_core::Role;

use crate::event::{BackendCommand, ConnectionState, UiEvent};
use crate::state::{UiState, View};
use crate::ui;

/// Main application with UI state and channel handles.
pub struct App {
    /// Current UI state snapshot for rendering.
    state: UiState,

    /// Receiver for events from the backend.
    ui_rx: mpsc::Receiver<UiEvent>,

    /// Sender for commands to the backend.
    cmd_tx: mpsc::Sender<BackendCommand>,
}

impl App {
    pub fn new(
        role: Role,
        ui_rx: mpsc::Receiver<UiEvent>,
        cmd_tx: mpsc::Sender<BackendCommand>,
    ) -> Self {
        Self {
            state: UiState::new(role),
            ui_rx,
            cmd_tx,
        }
    }

    /// Run the main event loop on the calling thread.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            terminal.draw(|frame| ui::render(frame, &self.state))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        break;
                    }
                }
            }

            while let Ok(event) = self.ui_rx.try_recv() {
                self.apply_event(event);
            }
        }

        let _ = self.cmd_tx.blocking_send(BackendCommand::Quit);

        Ok(())
    }

    /// Apply an event from the backend to the UI state.
    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ConversationOpened(conversation) => {
                self.state.conversation = conversation;
                self.state.view = match self.state.role {
                    Role::User => View::UserChat,
                    Role::Agent => View::AgentChat,
                };
                self.state.status_message = None;
            }
            UiEvent::ConversationUpdated(conversation) => {
                // Late updates for a conversation already closed are dropped.
                if self.state.is_chat_view() && conversation.id == self.state.conversation.id {
                    self.state.conversation = conversation;
                }
            }
            UiEvent::ConversationClosed => {
                self.state.conversation = chatline_core::Conversation::empty();
                self.state.view = View::Dashboard;
                self.state.status_message = None;
            }
            UiEvent::DashboardUpdated(conversations) => {
                self.state.set_conversations(conversations);
                self.state.last_error = None;
            }
            UiEvent::Alert(message) => {
                self.state.alert = Some(message);
            }
            UiEvent::Error(message) => {
                self.state.last_error = Some(message);
            }
            UiEvent::ConnectionStateChanged(new_state) => {
                self.state.connection_state = new_state;
                if new_state == ConnectionState::Connected {
                    self.state.last_error = None;
                }
            }
        }
    }

    fn command(&self, cmd: BackendCommand) {
        let _ = self.cmd_tx.try_send(cmd);
    }

    /// Handle a key press.
    ///
    /// Returns true if the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return true;
        }

        // An alert swallows input until dismissed.
        if self.state.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.alert = None;
            }
            return false;
        }

        if ctrl && key.code == KeyCode::Char('r') {
            self.command(BackendCommand::Refresh);
            return false;
        }

        match self.state.view {
            View::Dashboard => self.handle_dashboard_key(key.code),
            View::UserChat | View::AgentChat => self.handle_chat_key(key.code),
        }
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => self.state.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::Enter => {
                if let Some(summary) = self.state.selected_summary() {
                    let id = summary.id.clone();
                    self.state.status_message = Some(format!("Opening {}...", id));
                    self.command(BackendCommand::Open(id));
                }
            }
            KeyCode::Char('r') => self.command(BackendCommand::Refresh),
            _ => {}
        }
        false
    }

    fn handle_chat_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => match self.state.view {
                View::AgentChat => {
                    self.command(BackendCommand::Close);
                    self.state.view = View::Dashboard;
                    self.state.conversation = chatline_core::Conversation::empty();
                }
                _ => return true,
            },
            KeyCode::Enter => {
                if self.state.can_send() && !self.state.composer.value().trim().is_empty() {
                    let text = self.state.composer.take();
                    self.command(BackendCommand::Send(text));
                }
            }
            KeyCode::Char(ch) => {
                if !self.state.composer.insert(ch) {
                    self.state.status_message = Some(format!(
                        "Messages are limited to {} characters",
                        self.state.composer.max_chars()
                    ));
                }
            }
            KeyCode::Backspace => self.state.composer.backspace(),
            KeyCode::Delete => self.state.composer.delete(),
            KeyCode::Left => self.state.composer.move_left(),
            KeyCode::Right => self.state.composer.move_right(),
            KeyCode::Home => self.state.composer.move_home(),
            KeyCode::End => self.state.composer.move_end(),
            _ => {}
        }
        false
    }
}
