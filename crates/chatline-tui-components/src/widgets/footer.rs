//! Footer widget: key hints plus an optional status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme::Theme;

#[derive(Debug, Clone)]
pub struct Footer<'a> {
    /// Key hints, e.g. "Enter: send".
    hints: &'a str,
    /// Transient status shown after the hints.
    status: Option<&'a str>,
    theme: Theme,
}

impl<'a> Footer<'a> {
    pub fn new(hints: &'a str) -> Self {
        Self {
            hints,
            status: None,
            theme: Theme::default(),
        }
    }

    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(self.hints, self.theme.muted_style())];
        if let Some(status) = self.status {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(status, self.theme.error_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
