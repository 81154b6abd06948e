use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use runai_core::utils::truncate_string;

use crate::app::{App, Focus};
use crate::ui::styles;

use super::status_line;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    render_list(frame, app, chunks[0]);
    render_controls(frame, app, chunks[1]);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let docs = &app.documents;
    let focused = app.focus == Focus::Content;
    let height = area.height.saturating_sub(3) as usize;
    let name_width = (area.width as usize).saturating_sub(18).max(10);

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {:<width$}", "Name", width = name_width), styles::muted_style()),
        Span::styled(format!("{:>12}", "Size"), styles::muted_style()),
    ])];

    if docs.loading && docs.documents.is_empty() {
        lines.push(Line::from(Span::styled(" Loading documents...", styles::muted_style())));
    } else if docs.documents.is_empty() {
        lines.push(Line::from(Span::styled(
            " No documents found. Add files on the server and update the index.",
            styles::muted_style(),
        )));
    } else {
        // Keep the selection in view
        let start = docs.selection.saturating_sub(height.saturating_sub(1));
        for (i, doc) in docs.documents.iter().enumerate().skip(start).take(height) {
            let style = if i == docs.selection && focused {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!(
                        " {:<width$}",
                        truncate_string(&doc.name, name_width.saturating_sub(1)),
                        width = name_width
                    ),
                    style,
                ),
                Span::styled(format!("{:>12}", doc.size), styles::muted_style()),
            ]));
        }
    }

    let title = format!(" Documents ({}) ", docs.documents.len());
    let block = Block::default()
        .title(Span::styled(title, styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_controls(frame: &mut Frame, app: &App, area: Rect) {
    let docs = &app.documents;
    let update_label = if docs.updating { "Updating..." } else { "[u] Update index" };
    let reload_label = if docs.loading { "Loading..." } else { "[r] Reload" };

    let lines = vec![
        Line::from(vec![
            Span::raw(" "),
            Span::styled(update_label, styles::button_style(false, !docs.updating)),
            Span::raw("   "),
            Span::styled(reload_label, styles::button_style(false, !docs.loading)),
        ]),
        status_line(&docs.status),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
