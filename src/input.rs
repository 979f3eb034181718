use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Map a key event onto app state. Only key presses are handled, so one
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('r') => app.refresh_requested = true,
        KeyCode::Tab | KeyCode::Right => app.focus_next(),
        KeyCode::BackTab | KeyCode::Left => app.focus_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Enter | KeyCode::Char('o') => app.open_selected(),
        KeyCode::Char('m') => app.toggle_listing_mode(),
        _ => {}
    }
}
