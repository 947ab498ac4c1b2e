//! Keyboard input dispatch. Overlays see keys first, then comment entry, then global keys, then the focused pane.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use stocknote_core::SessionEvent;

use crate::app::{AppState, Overlay, Pane};

/// Handle a key event. `now` stamps commits and export file names.
pub fn handle_key(app: &mut AppState, key: KeyEvent, now: chrono::NaiveDateTime) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.overlay = Overlay::None;
            }
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::OpenFile => {
            handle_open_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Free-text comment entry swallows printable keys.
    if app.editing_comment() && handle_comment_key(app, key, now) {
        return;
    }

    // 3. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('o') => {
            app.overlay = Overlay::OpenFile;
            app.path_input.clear();
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('u') => {
            app.commit(now);
            return;
        }
        KeyCode::Char('s') => {
            app.export(now);
            return;
        }
        _ => {}
    }

    // 4. Pane-specific keys.
    match app.active_pane {
        Pane::Companies => handle_companies_key(app, key),
        Pane::Form => handle_form_key(app, key),
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_open_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.path_input.clear();
        }
        KeyCode::Enter => {
            let raw = app.path_input.trim().to_string();
            app.overlay = Overlay::None;
            app.path_input.clear();
            if !raw.is_empty() {
                app.open_file(&PathBuf::from(raw));
            }
        }
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => {
            app.path_input.push(c);
        }
        _ => {}
    }
}

/// Returns true if the key was consumed by the comment field.
fn handle_comment_key(app: &mut AppState, key: KeyEvent, now: chrono::NaiveDateTime) -> bool {
    let draft = app.session.draft_comment();
    match key.code {
        KeyCode::Char(c) => {
            let text = format!("{draft}{c}");
            app.dispatch(SessionEvent::EditComment(text));
            true
        }
        KeyCode::Backspace => {
            let mut text = draft.to_string();
            text.pop();
            app.dispatch(SessionEvent::EditComment(text));
            true
        }
        KeyCode::Enter => {
            app.commit(now);
            true
        }
        _ => false,
    }
}

fn handle_companies_key(app: &mut AppState, key: KeyEvent) {
    let count = app.companies.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if count > 0 && app.company_cursor + 1 < count {
                app.company_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.company_cursor = app.company_cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.company_cursor = 0;
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.company_cursor = count.saturating_sub(1);
        }
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if count > 0 {
                app.select_at_cursor();
                app.active_pane = Pane::Form;
            }
        }
        KeyCode::Tab => {
            app.active_pane = app.active_pane.toggle();
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down => {
            app.field = app.field.next();
        }
        KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Up => {
            app.field = app.field.prev();
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => cycle_choice(app, true),
        KeyCode::Char('h') | KeyCode::Left => cycle_choice(app, false),
        KeyCode::Esc => {
            app.active_pane = Pane::Companies;
        }
        _ => {}
    }
}

fn cycle_choice(app: &mut AppState, forward: bool) {
    if let Some(event) = app.field.cycle(app.session.form(), forward) {
        app.dispatch(event);
    }
}
