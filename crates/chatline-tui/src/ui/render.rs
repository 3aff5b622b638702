//! Main render function for the TUI.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::Frame;

use chatline_core::ConversationSummary;
use chatline_tui_components::{
    format_datetime, AlertDialog, ChatWidget, Composer, DataTable, Footer, Header,
    StatusIndicator, TableCell, TableColumn, TableRow,
};

use crate::event::ConnectionState;
use crate::state::{UiState, View};

/// Render the entire UI.
pub fn render(frame: &mut Frame, state: &UiState) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header_area, state);

    match state.view {
        View::Dashboard => render_dashboard(frame, body_area, state),
        View::UserChat | View::AgentChat => render_chat(frame, body_area, state),
    }

    render_footer(frame, footer_area, state);

    if let Some(message) = &state.alert {
        AlertDialog::new(message).render(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &UiState) {
    let status = match state.connection_state {
        ConnectionState::Connecting => StatusIndicator::warning("connecting"),
        ConnectionState::Connected => StatusIndicator::success("connected"),
        ConnectionState::Disconnected => StatusIndicator::error("unreachable"),
    };

    let header = Header::new("Chatline").status(status).stat("Role", state.role.name());
    let header = match state.view {
        View::Dashboard => header.stat("Conversations", state.conversations.len().to_string()),
        View::UserChat | View::AgentChat => {
            let id = if state.conversation.is_resolved() {
                state.conversation.id.to_string()
            } else {
                "-".to_string()
            };
            header
                .stat("Conversation", id)
                .stat("Messages", state.conversation.len().to_string())
        }
    };

    header.render(frame, area);
}

fn render_chat(frame: &mut Frame, area: Rect, state: &UiState) {
    let [log_area, composer_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);

    let lines = state.chat_lines();
    let placeholder = if state.conversation.is_resolved() {
        "No messages yet."
    } else {
        "Connecting to conversation..."
    };
    ChatWidget::new(&lines)
        .placeholder(placeholder)
        .focused(false)
        .render(frame, log_area);

    Composer::new(&state.composer)
        .enabled(state.can_send())
        .focused(state.alert.is_none())
        .render(frame, composer_area);
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &UiState) {
    let columns = [
        TableColumn::new("Conversation", 38),
        TableColumn::new("Updated", 20),
        TableColumn::new("Msgs", 5),
        TableColumn::new("Last", 6),
        TableColumn::flex("Preview", 20),
    ];
    let rows: Vec<TableRow> = state.conversations.iter().map(summary_row).collect();

    DataTable::new(&columns, &rows)
        .title(format!(" Conversations ({}) ", rows.len()))
        .selected(state.selected)
        .empty_message("No conversations yet.")
        .render(frame, area);
}

fn summary_row(summary: &ConversationSummary) -> TableRow {
    TableRow::new(vec![
        TableCell::cyan(summary.id.to_string()),
        TableCell::new(format_datetime(&summary.updated_at)),
        TableCell::new(summary.message_count.to_string()),
        TableCell::muted(summary.last_sender.map(|s| s.as_str()).unwrap_or("-")),
        TableCell::new(summary.preview.clone().unwrap_or_default()),
    ])
}

fn render_footer(frame: &mut Frame, area: Rect, state: &UiState) {
    let hints = if state.alert.is_some() {
        " Enter/Esc: dismiss "
    } else {
        match state.view {
            View::Dashboard => " Up/Down: select | Enter: open | r: refresh | Esc: quit ",
            View::AgentChat => " Enter: send | Ctrl-R: refresh | Esc: back ",
            View::UserChat => " Enter: send | Ctrl-R: refresh | Esc: quit ",
        }
    };

    let status = state
        .last_error
        .as_deref()
        .or(state.status_message.as_deref());

    Footer::new(hints).status(status).render(frame, area);
}
