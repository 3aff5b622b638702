//! Text utilities for TUI rendering.

use chrono::{DateTime, Local, Utc};
use unicode_width::UnicodeWidthChar;

/// Wrap text to fit within a given width, handling unicode safely.
///
/// Breaks on character boundaries only.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![];
    }

    let mut lines = Vec::new();

    for line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for ch in line.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
            if current_width + ch_width > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Word-wrap text, prefixing every produced line with `indent`.
pub fn wrap_text_indented(text: &str, width: usize, indent: &str) -> Vec<String> {
    let effective_width = width.saturating_sub(indent.chars().count());

    if effective_width == 0 {
        return vec![format!("{}{}", indent, text)];
    }

    let mut lines = Vec::new();

    for line in text.lines() {
        let mut current = String::new();

        for word in line.split(' ') {
            let candidate_len = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };

            if candidate_len <= effective_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                continue;
            }

            if !current.is_empty() {
                lines.push(format!("{}{}", indent, current));
                current.clear();
            }

            // Words longer than a line are hard-split.
            let mut chunk = wrap_text(word, effective_width);
            let tail = chunk.pop().unwrap_or_default();
            for piece in chunk {
                lines.push(format!("{}{}", indent, piece));
            }
            current = tail;
        }

        lines.push(format!("{}{}", indent, current));
    }

    if lines.is_empty() {
        lines.push(indent.to_string());
    }

    lines
}

/// Time of day in the local timezone, for message headers.
pub fn format_clock(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Date and time in the local timezone, for listings.
pub fn format_datetime(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        let wrapped = wrap_text("Hello world", 5);
        assert_eq!(wrapped, vec!["Hello", " worl", "d"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_text_indented_breaks_on_words() {
        let wrapped = wrap_text_indented("the quick brown fox", 12, "  ");
        assert_eq!(wrapped, vec!["  the quick", "  brown fox"]);
    }

    #[test]
    fn test_wrap_text_indented_splits_long_words() {
        let wrapped = wrap_text_indented("abcdefghij", 6, "  ");
        assert_eq!(wrapped, vec!["  abcd", "  efgh", "  ij"]);
    }

    #[test]
    fn test_wrap_text_indented_keeps_blank_lines() {
        let wrapped = wrap_text_indented("hi\n\nthere", 20, "> ");
        assert_eq!(wrapped, vec!["> hi", "> ", "> there"]);
    }

    #[test]
    fn test_format_lengths() {
        let ts = Utc::now();
        assert_eq!(format_clock(&ts).len(), 8);
        assert_eq!(format_datetime(&ts).len(), 19);
    }
}
