use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use runai_core::models::{ChatMessage, Role};

use crate::app::{App, Focus};
use crate::ui::styles;

use super::{bottom_offset, wrap_text};

const GREETING: &str = "Ask your coach anything about training, recovery or race preparation.";

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    render_transcript(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);
}

fn render_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(4) as usize;
    let height = area.height.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    if app.chat.messages.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", GREETING), styles::muted_style())));
    }
    for message in &app.chat.messages {
        lines.extend(message_lines(message, width));
    }
    if app.chat.waiting {
        lines.push(Line::from(vec![
            Span::styled(" A ", styles::avatar_style(false)),
            Span::styled(" Coach is thinking...", styles::muted_style()),
        ]));
    }

    let offset = bottom_offset(lines.len(), height, app.chat.scroll);
    let visible: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();

    let block = Block::default()
        .title(Span::styled(" Coach ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

fn message_lines(message: &ChatMessage, width: usize) -> Vec<Line<'static>> {
    let is_user = message.role == Role::User;
    let name = if is_user { "You" } else { "Coach" };
    let text_style = if message.is_error {
        styles::error_style()
    } else {
        styles::list_item_style()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {} ", message.role.avatar()), styles::avatar_style(is_user)),
        Span::styled(format!(" {}", name), styles::highlight_style()),
        Span::styled(
            format!("  {}", timestamp(&message.sent_at, &Local::now())),
            styles::muted_style(),
        ),
    ])];
    for text in wrap_text(&message.content, width.saturating_sub(1)) {
        lines.push(Line::from(Span::styled(format!(" {}", text), text_style)));
    }
    lines.push(Line::from(""));
    lines
}

/// Time of day for today's messages, date and time for older ones
fn timestamp(sent_at: &DateTime<Local>, now: &DateTime<Local>) -> String {
    if sent_at.date_naive() == now.date_naive() {
        sent_at.format("%H:%M").to_string()
    } else {
        sent_at.format("%d/%m %H:%M").to_string()
    }
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Content;
    let width = area.width.saturating_sub(4) as usize;

    let line = if app.chat.waiting {
        Line::from(Span::styled(" Waiting for the coach...", styles::muted_style()))
    } else if app.chat.input.is_empty() && !focused {
        Line::from(Span::styled(" Press Enter to start typing", styles::muted_style()))
    } else {
        // Keep the end of the prompt visible while typing
        let count = app.chat.input.chars().count();
        let shown: String = app.chat.input.chars().skip(count.saturating_sub(width)).collect();
        let cursor = if focused { "▌" } else { "" };
        Line::from(vec![
            Span::raw(" "),
            Span::styled(shown, styles::list_item_style()),
            Span::styled(cursor, styles::highlight_style()),
        ])
    };

    let block = Block::default()
        .title(Span::styled(" Your question ", styles::muted_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused && !app.chat.waiting));

    frame.render_widget(Paragraph::new(line).block(block), area);
}
