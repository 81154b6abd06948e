//! Page content rendering, one module per sidebar entry.

pub mod chat;
pub mod documents;
pub mod profile;
pub mod program;

use ratatui::text::{Line, Span};

use crate::app::StatusLine;
use crate::ui::styles;

/// Word-wrap text to a column width. Words longer than the width are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }
        lines.push(current);
    }

    lines
}

/// First line to show so the view ends `scroll` lines above the bottom
pub fn bottom_offset(total: usize, height: usize, scroll: u16) -> usize {
    total.saturating_sub(height).saturating_sub(scroll as usize)
}

pub fn status_line(status: &Option<StatusLine>) -> Line<'static> {
    match status {
        Some(status) => Line::from(Span::styled(
            format!(" {}", status.text),
            styles::status_style(status.kind),
        )),
        None => Line::from(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_breaks_on_words() {
        assert_eq!(
            wrap_text("run easy on monday", 8),
            vec!["run easy", "on", "monday"]
        );
    }

    #[test]
    fn test_wrap_text_keeps_blank_lines() {
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_bottom_offset() {
        assert_eq!(bottom_offset(50, 10, 0), 40);
        assert_eq!(bottom_offset(50, 10, 15), 25);
        assert_eq!(bottom_offset(5, 10, 3), 0);
    }
}
