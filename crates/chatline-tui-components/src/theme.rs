//! Theme and style definitions.

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for Chatline TUI applications.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary accent color (focused borders, selection)
    pub accent: Color,
    /// Success color (connected)
    pub success: Color,
    /// Warning color (connecting, pending)
    pub warning: Color,
    /// Error color (alerts, disconnected)
    pub error: Color,
    /// Muted color (timestamps, hints)
    pub muted: Color,
    /// Messages written by this side
    pub outgoing: Color,
    /// Messages written by the other side
    pub incoming: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Yellow,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::DarkGray,
            outgoing: Color::Cyan,
            incoming: Color::Green,
        }
    }
}

impl Theme {
    /// Style for focused/active borders.
    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Style for unfocused borders.
    pub fn unfocused_border(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Style for muted/secondary text.
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn outgoing_style(&self) -> Style {
        Style::default().fg(self.outgoing).add_modifier(Modifier::BOLD)
    }

    pub fn incoming_style(&self) -> Style {
        Style::default().fg(self.incoming).add_modifier(Modifier::BOLD)
    }

    /// Highlight for the selected table row.
    pub fn selected_row(&self) -> Style {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    }
}
