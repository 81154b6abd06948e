//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Requests are only started here; their results
//! arrive later through `App::check_background_tasks`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use runai_core::forms::AuthFocus;
use runai_core::nav::{Page, Screen};

use crate::app::{App, AppState, Focus, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Handle logout confirmation
    if matches!(app.state, AppState::ConfirmingLogout) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.logout(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    match app.screen() {
        Screen::Login => handle_login_input(app, key),
        Screen::Page(page) => match app.focus {
            Focus::Sidebar => handle_sidebar_input(app, key),
            Focus::Content => {
                if key.code == KeyCode::Esc {
                    app.focus = Focus::Sidebar;
                    return false;
                }
                match page {
                    Page::Chat => handle_chat_input(app, key),
                    Page::Documents => handle_documents_input(app, key),
                    Page::Profile => handle_profile_input(app, key),
                    Page::Program => handle_program_input(app, key),
                }
                false
            }
        },
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> bool {
    let form = &mut app.auth_form;

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') && !form.submitting {
            form.toggle_mode();
        }
        return false;
    }

    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Down | KeyCode::Tab => form.focus_next(),
        KeyCode::Up | KeyCode::BackTab => form.focus_prev(),
        KeyCode::Enter => match form.focus {
            AuthFocus::Email => form.focus = AuthFocus::Password,
            AuthFocus::Password | AuthFocus::Submit => app.submit_auth(),
        },
        KeyCode::Backspace if !form.submitting => form.pop_char(),
        KeyCode::Char(c) if !form.submitting => {
            form.push_char(c);
        }
        _ => {}
    }
    false
}

fn handle_sidebar_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('L') | KeyCode::Char('l') => app.state = AppState::ConfirmingLogout,
        KeyCode::Up | KeyCode::Char('k') => app.select_page(app.page.prev()),
        KeyCode::Down | KeyCode::Char('j') => app.select_page(app.page.next()),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.select_page(Page::ALL[index]);
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Tab => {
            app.select_page(app.page);
            app.focus = Focus::Content;
        }
        _ => {}
    }
    false
}

fn handle_chat_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.send_prompt(),
        KeyCode::Backspace if !app.chat.waiting => {
            app.chat.input.pop();
        }
        KeyCode::PageUp => {
            app.chat.scroll = app.chat.scroll.saturating_add(PAGE_SCROLL_SIZE);
        }
        KeyCode::PageDown => {
            app.chat.scroll = app.chat.scroll.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::End => app.chat.scroll = 0,
        KeyCode::Char(c) => app.push_prompt_char(c),
        _ => {}
    }
}

fn handle_documents_input(app: &mut App, key: KeyEvent) {
    let docs = &mut app.documents;
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            docs.selection = docs.selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if docs.selection + 1 < docs.documents.len() {
                docs.selection += 1;
            }
        }
        KeyCode::Char('r') => app.load_documents(),
        KeyCode::Char('u') => app.update_index(),
        _ => {}
    }
}

fn handle_profile_input(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('s') {
            app.save_profile();
        }
        return;
    }

    let profile = &mut app.profile;
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
            profile.form.focus = profile.form.focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            profile.form.focus = profile.form.focus.prev();
        }
        // Fields stay read-only while a load or save is in flight
        _ if profile.loading || profile.saving => {}
        KeyCode::Right => profile.form.cycle_selection(true),
        KeyCode::Left => profile.form.cycle_selection(false),
        KeyCode::Backspace => profile.form.pop_char(),
        KeyCode::Char(' ') if profile.form.focus.is_selection() => {
            profile.form.cycle_selection(true);
        }
        KeyCode::Char(c) => {
            if profile.form.push_char(c) {
                profile.status = None;
            }
        }
        _ => {}
    }
}

fn handle_program_input(app: &mut App, key: KeyEvent) {
    let program = &mut app.program;
    let line_count = program
        .program
        .as_deref()
        .map_or(0, |text| text.lines().count());
    let max_scroll = u16::try_from(line_count).unwrap_or(u16::MAX);

    match key.code {
        KeyCode::Char('g') => app.generate_program(),
        KeyCode::Up | KeyCode::Char('k') => {
            program.scroll = program.scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            program.scroll = program.scroll.saturating_add(1).min(max_scroll);
        }
        KeyCode::PageUp => {
            program.scroll = program.scroll.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::PageDown => {
            program.scroll = program.scroll.saturating_add(PAGE_SCROLL_SIZE).min(max_scroll);
        }
        KeyCode::Home => program.scroll = 0,
        _ => {}
    }
}
