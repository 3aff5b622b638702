//! Modal dialogs.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::theme::Theme;

/// Create a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// A blocking notice the user must acknowledge.
#[derive(Debug, Clone)]
pub struct AlertDialog<'a> {
    message: &'a str,
    width: u16,
    theme: Theme,
}

impl<'a> AlertDialog<'a> {
    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            width: 50,
            theme: Theme::default(),
        }
    }

    /// Height needed to show the message wrapped inside the borders.
    fn height(&self) -> u16 {
        let inner = self.width.saturating_sub(4).max(1) as usize;
        let message_lines = self.message.chars().count().div_ceil(inner).max(1) as u16;
        // borders, padding above and below, button line
        message_lines + 5
    }

    /// Render the dialog over whatever is on screen.
    pub fn render(self, frame: &mut Frame) {
        let area = centered_rect(self.width, self.height(), frame.area());

        frame.render_widget(Clear, area);

        let lines = vec![
            Line::from(""),
            Line::from(self.message),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] OK",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" Alert ")
                    .borders(Borders::ALL)
                    .border_style(self.theme.error_style()),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);
    }
}
