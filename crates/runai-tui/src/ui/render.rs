use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use runai_core::forms::AuthFocus;
use runai_core::nav::{Page, Screen};
use runai_core::utils::{avatar_letter, truncate_string};

use crate::app::{App, AppState, Focus};

use super::pages::{chat, documents, profile, program};
use super::styles;

/// Sidebar width in columns
const SIDEBAR_WIDTH: u16 = 26;

/// Width of text fields in the login dialog
const FIELD_WIDTH: usize = 28;

const LOGO: [&str; 3] = [
    "    ╦═╗╦ ╦╔╗╔   ╔═╗╦",
    "    ╠╦╝║ ║║║║   ╠═╣║",
    "    ╩╚═╚═╝╝╚╝   ╩ ╩╩",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);

    match app.screen() {
        Screen::Login => render_login(frame, app, chunks[1]),
        Screen::Page(page) => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(30)])
                .split(chunks[1]);
            render_sidebar(frame, app, body[0]);
            render_page(frame, app, page, body[1]);
        }
    }

    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => {
            render_confirm_overlay(frame, "Are you sure you want to quit?", "to quit")
        }
        AppState::ConfirmingLogout => {
            render_confirm_overlay(frame, "Log out of RUN AI?", "to log out")
        }
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  RUN AI · your running coach";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + help_hint.len() + 2),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_page(frame: &mut Frame, app: &App, page: Page, area: Rect) {
    match page {
        Page::Chat => chat::render(frame, app, area),
        Page::Documents => documents::render(frame, app, area),
        Page::Profile => profile::render(frame, app, area),
        Page::Program => program::render(frame, app, area),
    }
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Sidebar;
    let mut lines = vec![Line::from("")];

    for (i, page) in Page::ALL.iter().enumerate() {
        let selected = *page == app.page;
        let marker = if selected { "▶ " } else { "  " };
        let style = if selected && focused {
            styles::selected_style()
        } else {
            styles::page_style(selected)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" [{}] ", i + 1), styles::muted_style()),
            Span::styled(format!("{}{}", marker, page.title()), style),
        ]));
    }

    // Identity and logout pinned to the bottom
    let inner_height = area.height.saturating_sub(2) as usize;
    let footer_height = 3;
    while lines.len() + footer_height < inner_height {
        lines.push(Line::from(""));
    }

    let email = app.user_email().unwrap_or_default();
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(format!(" {} ", avatar_letter(&email)), styles::avatar_style(true)),
        Span::raw(" "),
        Span::styled(
            truncate_string(&email, SIDEBAR_WIDTH as usize - 8),
            styles::list_item_style(),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" [L] ", styles::help_key_style()),
        Span::styled("Log out", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(Span::styled(" Menu ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match (app.screen(), app.focus) {
        (Screen::Login, _) => "[Tab] next field | [Ctrl+R] switch mode | [Esc] quit",
        (Screen::Page(_), Focus::Sidebar) => "[↑↓] pages | [Enter] open | [L]ogout | [q]uit",
        (Screen::Page(page), Focus::Content) => page_shortcuts(page),
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.api.base_url()),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn page_shortcuts(page: Page) -> &'static str {
    match page {
        Page::Chat => "[Enter] send | [PgUp/PgDn] scroll | [Esc] menu",
        Page::Documents => "[r]eload | [u]pdate index | [Esc] menu",
        Page::Profile => "[Tab] next field | [←→] choose | [Ctrl+S] save | [Esc] menu",
        Page::Program => "[g]enerate | [↑↓] scroll | [Esc] menu",
    }
}

fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|line| Line::from(Span::styled(*line, styles::title_style())))
        .collect()
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.auth_form;

    // Fixed size dialog - compact
    let height = if form.error.is_some() { 17 } else { 15 };
    let area = centered_rect_fixed(46, height, area);

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {}", form.title()),
        styles::highlight_style(),
    )));
    lines.push(Line::from(""));

    let email = truncate_tail(&form.email, FIELD_WIDTH);
    lines.push(field_line("Email", &email, form.focus == AuthFocus::Email));
    let masked = "*".repeat(form.password.chars().count().min(FIELD_WIDTH));
    lines.push(field_line("Password", &masked, form.focus == AuthFocus::Password));

    // Submit button
    lines.push(Line::from(""));
    let focused = form.focus == AuthFocus::Submit;
    let label = if form.submitting {
        "Please wait...".to_string()
    } else if focused {
        format!("▶ {} ◀", form.submit_label())
    } else {
        form.submit_label().to_string()
    };
    lines.push(Line::from(vec![
        Span::raw("             ["),
        Span::styled(
            format!(" {:^14} ", label),
            styles::button_style(focused, !form.submitting),
        ),
        Span::raw("]"),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {}", form.toggle_hint()),
        styles::muted_style(),
    )));

    // Error message
    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate_string(error, 40)),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { " " };
    Line::from(vec![
        Span::styled(format!("  {:>8}: [", label), styles::muted_style()),
        Span::styled(format!("{:<width$}{}", value, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style()),
    ])
}

/// Keep the end of a long value visible while typing
fn truncate_tail(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        s.chars().skip(count - max_len).collect()
    }
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 27, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<11}", k), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let mut help_text = logo_lines();
    help_text.extend([
        Line::from(Span::styled(
            format!("          version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        key("1-4", "Switch pages"),
        key("↑/↓", "Move in the menu"),
        key("Enter/→", "Open the selected page"),
        key("Esc", "Back to the menu"),
        key("L", "Log out"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Pages", styles::highlight_style())),
        key("Enter", "Coach: send your question"),
        key("r / u", "Documents: reload / update the index"),
        key("Tab", "Profile: next field"),
        key("←/→", "Profile: change a choice"),
        key("Ctrl+S", "Profile: save"),
        key("g", "Program: generate a new program"),
        key("PgUp/PgDn", "Scroll long text"),
        Line::from(""),
        Line::from(vec![
            Span::styled("         Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_confirm_overlay(frame: &mut Frame, question: &str, action: &str) {
    // Fixed size dialog matching login screen
    let area = centered_rect_fixed(46, 9, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            format!("   {}", question),
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(format!(" {}, ", action), styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed() {
        let outer = Rect::new(0, 0, 100, 40);
        let rect = centered_rect_fixed(46, 10, outer);
        assert_eq!(rect, Rect::new(27, 15, 46, 10));

        // Never larger than the area it is centered in
        let small = centered_rect_fixed(46, 10, Rect::new(0, 0, 20, 5));
        assert_eq!(small.width, 20);
        assert_eq!(small.height, 5);
    }

    #[test]
    fn test_truncate_tail_keeps_end() {
        assert_eq!(truncate_tail("short", 10), "short");
        assert_eq!(truncate_tail("abcdefghij", 4), "ghij");
    }
}
