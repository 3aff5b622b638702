//! Single-line message composer.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;

/// Editable text with a character cursor and a length cap.
///
/// All positions are in characters, so multi-byte input is safe.
#[derive(Debug, Clone)]
pub struct ComposerState {
    value: String,
    cursor: usize,
    max_chars: usize,
}

impl ComposerState {
    pub fn new(max_chars: usize) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            max_chars,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Insert a character at the cursor. Returns false at the length cap.
    pub fn insert(&mut self, ch: char) -> bool {
        if self.len() >= self.max_chars {
            return false;
        }
        let idx = self.byte_index(self.cursor);
        self.value.insert(idx, ch);
        self.cursor += 1;
        true
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index(self.cursor);
        self.value.remove(idx);
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    /// Take the text out, leaving the composer empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

/// Renders a [`ComposerState`] as a bordered input line with a counter.
#[derive(Debug, Clone)]
pub struct Composer<'a> {
    state: &'a ComposerState,
    focused: bool,
    enabled: bool,
    theme: Theme,
}

impl<'a> Composer<'a> {
    pub fn new(state: &'a ComposerState) -> Self {
        Self {
            state,
            focused: true,
            enabled: true,
            theme: Theme::default(),
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// A disabled composer shows why input is not possible yet.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused && self.enabled {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };

        let content = if !self.enabled {
            Line::from(Span::styled("Connecting...", self.theme.muted_style()))
        } else if self.state.is_empty() && !self.focused {
            Line::from(Span::styled(
                format!("Type your message (max {} characters)...", self.state.max_chars()),
                self.theme.muted_style(),
            ))
        } else {
            let before: String = self.state.value().chars().take(self.state.cursor()).collect();
            let after: String = self.state.value().chars().skip(self.state.cursor()).collect();
            Line::from(vec![
                Span::raw(before),
                Span::styled("|", Style::default().fg(self.theme.accent)),
                Span::raw(after),
            ])
        };

        let counter_style = if self.state.len() >= self.state.max_chars() {
            self.theme.error_style()
        } else {
            self.theme.muted_style()
        };
        let counter = format!(" {}/{} ", self.state.len(), self.state.max_chars());

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Message ")
                .title_bottom(Line::from(Span::styled(counter, counter_style)).right_aligned()),
        );

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor_movement() {
        let mut state = ComposerState::new(10);
        for ch in "helo".chars() {
            state.insert(ch);
        }
        state.move_left();
        state.insert('l');
        assert_eq!(state.value(), "hello");
        assert_eq!(state.cursor(), 4);

        state.move_end();
        state.backspace();
        assert_eq!(state.value(), "hell");

        state.move_home();
        state.delete();
        assert_eq!(state.value(), "ell");
    }

    #[test]
    fn test_unicode_editing() {
        let mut state = ComposerState::new(10);
        for ch in "héé".chars() {
            state.insert(ch);
        }
        state.backspace();
        assert_eq!(state.value(), "hé");
        state.move_left();
        state.insert('ñ');
        assert_eq!(state.value(), "hñé");
    }

    #[test]
    fn test_length_cap() {
        let mut state = ComposerState::new(3);
        assert!(state.insert('a'));
        assert!(state.insert('b'));
        assert!(state.insert('c'));
        assert!(!state.insert('d'));
        assert_eq!(state.value(), "abc");
    }

    #[test]
    fn test_take_clears() {
        let mut state = ComposerState::new(10);
        state.insert('x');
        assert_eq!(state.take(), "x");
        assert!(state.is_empty());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_edges_are_noops() {
        let mut state = ComposerState::new(5);
        state.backspace();
        state.delete();
        state.move_left();
        state.move_right();
        assert!(state.is_empty());
        assert_eq!(state.cursor(), 0);
    }
}
