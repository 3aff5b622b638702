//! Header widget for TUI applications.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;

/// Status indicator for the header.
#[derive(Debug, Clone)]
pub struct StatusIndicator {
    pub label: String,
    pub color: Color,
}

impl StatusIndicator {
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }

    pub fn success(label: impl Into<String>) -> Self {
        Self::new(label, Color::Green)
    }

    pub fn warning(label: impl Into<String>) -> Self {
        Self::new(label, Color::Yellow)
    }

    pub fn error(label: impl Into<String>) -> Self {
        Self::new(label, Color::Red)
    }
}

/// One-line bordered header: title, connection status, then `label: value` pairs.
#[derive(Debug, Clone)]
pub struct Header<'a> {
    title: &'a str,
    status: Option<StatusIndicator>,
    stats: Vec<(String, String)>,
    theme: Theme,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            status: None,
            stats: Vec::new(),
            theme: Theme::default(),
        }
    }

    pub fn status(mut self, status: StatusIndicator) -> Self {
        self.status = Some(status);
        self
    }

    /// Append a `label: value` pair after the title.
    pub fn stat(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.stats.push((label.into(), value.into()));
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let mut title_spans = vec![Span::raw(format!(" {} ", self.title))];
        if let Some(status) = &self.status {
            title_spans.push(Span::styled(
                format!("[{}] ", status.label),
                Style::default().fg(status.color),
            ));
        }

        let mut stat_spans = Vec::new();
        for (i, (label, value)) in self.stats.iter().enumerate() {
            if i > 0 {
                stat_spans.push(Span::styled(" | ", self.theme.muted_style()));
            }
            stat_spans.push(Span::raw(format!("{}: ", label)));
            stat_spans.push(Span::styled(value.clone(), Style::default().fg(self.theme.outgoing)));
        }

        let paragraph = Paragraph::new(Line::from(stat_spans)).block(
            Block::default()
                .title(Line::from(title_spans))
                .borders(Borders::ALL)
                .border_style(self.theme.unfocused_border()),
        );

        frame.render_widget(paragraph, area);
    }
}
