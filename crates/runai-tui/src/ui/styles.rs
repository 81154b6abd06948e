use ratatui::style::{Color, Modifier, Style};

use crate::app::StatusKind;

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn page_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

/// Avatar badge beside chat messages and in the sidebar
pub fn avatar_style(is_user: bool) -> Style {
    let bg = if is_user { PRIMARY } else { SECONDARY };
    Style::default()
        .bg(bg)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Button rendering: focused, enabled, or greyed out while disabled
pub fn button_style(focused: bool, enabled: bool) -> Style {
    match (enabled, focused) {
        (false, _) => muted_style(),
        (true, true) => selected_style().fg(PRIMARY),
        (true, false) => list_item_style(),
    }
}

pub fn status_style(kind: StatusKind) -> Style {
    match kind {
        StatusKind::Info => muted_style(),
        StatusKind::Success => success_style(),
        StatusKind::Error => error_style(),
    }
}
