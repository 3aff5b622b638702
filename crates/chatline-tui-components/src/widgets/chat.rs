//! Chat widget for displaying conversation messages.

use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;
use crate::utils::{format_clock, wrap_text_indented};

/// Which side of the conversation wrote a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Written by the viewer.
    Outgoing,
    /// Written by the other participant.
    Incoming,
}

/// A single chat message, ready for display.
#[derive(Debug, Clone)]
pub struct ChatLine {
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
}

/// Message log pinned to the newest line.
#[derive(Debug, Clone)]
pub struct ChatWidget<'a> {
    /// Messages to display, oldest first.
    messages: &'a [ChatLine],
    /// Whether the widget is focused.
    focused: bool,
    /// Shown when there are no messages.
    placeholder: &'a str,
    /// Theme for styling.
    theme: Theme,
}

impl<'a> ChatWidget<'a> {
    /// Create a new chat widget.
    pub fn new(messages: &'a [ChatLine]) -> Self {
        Self {
            messages,
            focused: false,
            placeholder: "No messages yet.",
            theme: Theme::default(),
        }
    }

    /// Set whether the widget is focused.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = text;
        self
    }

    /// Lay out every message as display lines.
    fn build_lines(&self, text_width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for msg in self.messages {
            let style = match msg.direction {
                Direction::Outgoing => self.theme.outgoing_style(),
                Direction::Incoming => self.theme.incoming_style(),
            };

            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", msg.author), style),
                Span::styled(format_clock(&msg.timestamp), self.theme.muted_style()),
            ]));
            for wrapped in wrap_text_indented(&msg.content, text_width, "  ") {
                lines.push(Line::from(wrapped));
            }
            lines.push(Line::from(""));
        }

        lines
    }

    /// Render the widget.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };

        let visible_height = area.height.saturating_sub(2) as usize;
        let text_width = area.width.saturating_sub(2) as usize;

        let mut all_lines = self.build_lines(text_width);
        if all_lines.is_empty() {
            all_lines.push(Line::from(Span::styled(
                self.placeholder.to_string(),
                self.theme.muted_style(),
            )));
        }
        let total_lines = all_lines.len();

        // Always follow the newest line.
        let offset = total_lines.saturating_sub(visible_height);

        let lines: Vec<Line> = all_lines
            .into_iter()
            .skip(offset)
            .take(visible_height)
            .collect();

        let title = format!(" Messages ({}) ", self.messages.len());

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );

        frame.render_widget(paragraph, area);
    }
}
