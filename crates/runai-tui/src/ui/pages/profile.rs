use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use runai_core::forms::ProfileField;

use crate::app::{App, Focus};
use crate::ui::styles;

use super::status_line;

const LABEL_WIDTH: usize = 26;
const VALUE_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(12), Constraint::Length(5)])
        .split(area);

    render_fields(frame, app, chunks[0]);
    render_controls(frame, app, chunks[1]);
}

fn render_fields(frame: &mut Frame, app: &App, area: Rect) {
    let profile = &app.profile;
    let focused = app.focus == Focus::Content;

    let mut lines = vec![Line::from("")];
    if profile.loading {
        lines.push(Line::from(Span::styled(" Loading your profile...", styles::muted_style())));
        lines.push(Line::from(""));
    }

    for field in ProfileField::ALL {
        let is_focused = focused && profile.form.focus == field;
        let required = if field.is_required() { "*" } else { " " };
        let value = profile.form.value(field);

        let value_span = if field.is_selection() {
            let text = if is_focused {
                format!("◀ {} ▶", value)
            } else {
                format!("  {}  ", value)
            };
            Span::styled(
                format!("{:<width$}", text, width = VALUE_WIDTH),
                if is_focused { styles::selected_style() } else { styles::highlight_style() },
            )
        } else {
            let cursor = if is_focused { "▌" } else { "" };
            Span::styled(
                format!("{:<width$}", format!("{}{}", value, cursor), width = VALUE_WIDTH),
                if is_focused { styles::selected_style() } else { styles::list_item_style() },
            )
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {}", required), styles::error_style()),
            Span::styled(
                format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                styles::muted_style(),
            ),
            Span::styled("[", styles::muted_style()),
            value_span,
            Span::styled("]", styles::muted_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" * required", styles::muted_style())));

    let block = Block::default()
        .title(Span::styled(" My Profile ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let profile = &app.profile;
    let label = if profile.saving { "Saving..." } else { "[Ctrl+S] Save" };

    let mut lines = vec![Line::from(vec![
        Span::raw(" "),
        Span::styled(label, styles::button_style(false, profile.can_save())),
    ])];

    let missing = profile.form.missing_required();
    if !missing.is_empty() && profile.status.is_none() {
        lines.push(Line::from(Span::styled(
            format!(" Still needed: {}", missing.join(", ")),
            styles::muted_style(),
        )));
    } else {
        lines.push(status_line(&profile.status));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
