use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;

use super::wrap_text;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_controls(frame, app, chunks[0]);
    render_program(frame, app, chunks[1]);
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let program = &app.program;
    let label = if program.generating {
        "Generating your program..."
    } else {
        "[g] Generate a new program"
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(label, styles::button_style(false, !program.generating)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_program(frame: &mut Frame, app: &App, area: Rect) {
    let program = &app.program;
    let focused = app.focus == Focus::Content;
    let width = area.width.saturating_sub(3) as usize;
    let height = area.height.saturating_sub(2) as usize;

    let lines = if let Some(ref error) = program.error {
        vec![Line::from(Span::styled(format!(" {}", error), styles::error_style()))]
    } else if let Some(ref text) = program.program {
        markdown_lines(text, width)
    } else if program.generating {
        vec![Line::from(Span::styled(" Working on it...", styles::muted_style()))]
    } else {
        vec![Line::from(Span::styled(
            " Fill in your profile, then generate a program tailored to you.",
            styles::muted_style(),
        ))]
    };

    // Scroll from the top, never past the last screenful
    let max_offset = lines.len().saturating_sub(height);
    let offset = (program.scroll as usize).min(max_offset);
    let visible: Vec<Line> = lines.into_iter().skip(offset).collect();

    let block = Block::default()
        .title(Span::styled(" My Program ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

/// Render the small subset of markdown programs use: headings, bullets,
/// and bold markers (which are dropped).
fn markdown_lines(text: &str, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for raw in text.lines() {
        let line = raw.trim_end().replace("**", "");
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            let heading = trimmed.trim_start_matches('#').trim().to_string();
            let style = styles::title_style().add_modifier(Modifier::UNDERLINED);
            lines.push(Line::from(Span::styled(format!(" {}", heading), style)));
            continue;
        }

        let (prefix, body) = match trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            Some(item) => ("  • ", item),
            None => (" ", trimmed),
        };
        let wrapped = wrap_text(body, width.saturating_sub(prefix.chars().count()));
        if wrapped.is_empty() {
            lines.push(Line::from(""));
        }
        for (i, part) in wrapped.into_iter().enumerate() {
            let lead = if i == 0 { prefix.to_string() } else { " ".repeat(prefix.chars().count()) };
            lines.push(Line::from(vec![
                Span::styled(lead, styles::highlight_style()),
                Span::styled(part, styles::list_item_style()),
            ]));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_markdown_headings_and_bullets() {
        let text = "# Week 1\n- **Monday**: easy 5 km\n\nRest well.";
        let rendered = plain(&markdown_lines(text, 40));
        assert_eq!(
            rendered,
            vec![" Week 1", "  • Monday: easy 5 km", "", " Rest well."]
        );
    }

    #[test]
    fn test_markdown_wraps_bullets_with_indent() {
        let rendered = plain(&markdown_lines("- one two three", 10));
        assert_eq!(rendered, vec!["  • one", "    two", "    three"]);
    }
}
