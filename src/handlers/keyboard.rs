//! Keyboard Input Handler
//!
//! Handles all keyboard input and user interactions. Keys are routed to the
//! topmost surface: help overlay, clear-bookmarks prompt, search, station
//! modal, menu panel, then the map.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use kelitui::logic::map::PAN_STEP;

use crate::App;

/// Handle keyboard input
///
/// Processes all keyboard events and dispatches to appropriate actions.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind == KeyEventKind::Release {
        return Ok(());
    }

    // Ctrl-C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.session.model.ui.should_quit = true;
        return Ok(());
    }

    if app.session.model.ui.show_help {
        // Any key closes the help overlay
        app.session.model.ui.show_help = false;
        return Ok(());
    }

    if app.session.model.menu.confirm_clear {
        handle_confirm_clear(app, key);
        return Ok(());
    }

    if app.session.model.ui.search_mode {
        handle_search_key(app, key);
        return Ok(());
    }

    if app.session.model.modal().is_some() {
        handle_modal_key(app, key);
        return Ok(());
    }

    if app.session.model.menu.open {
        handle_menu_key(app, key);
        return Ok(());
    }

    handle_map_key(app, key);
    Ok(())
}

fn handle_confirm_clear(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.session.clear_bookmarks();
            app.session
                .model
                .show_toast("All bookmarks removed".to_string());
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.session.model.menu.confirm_clear = false;
        }
        // Ignore other keys while prompt is showing
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.session.model.ui.cancel_search(),
        KeyCode::Enter => {
            let cmds = app.session.open_search_result();
            app.dispatch(cmds);
        }
        KeyCode::Backspace => {
            app.session.model.ui.search_query.pop();
            app.session.model.ui.search_selected = 0;
        }
        KeyCode::Down | KeyCode::Tab => {
            let count = app.session.search_results().len();
            let ui = &mut app.session.model.ui;
            if count > 0 {
                ui.search_selected = (ui.search_selected + 1).min(count - 1);
            }
        }
        KeyCode::Up | KeyCode::BackTab => {
            let ui = &mut app.session.model.ui;
            ui.search_selected = ui.search_selected.saturating_sub(1);
        }
        KeyCode::Char(c) => {
            app.session.model.ui.search_query.push(c);
            app.session.model.ui.search_selected = 0;
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            // Close modal; graphics protocols may leave the image behind
            app.session.close_station();
            app.session.model.ui.sixel_cleanup_frames = 1;
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
            let cmds = app.session.next_camera();
            app.dispatch(cmds);
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
            let cmds = app.session.prev_camera();
            app.dispatch(cmds);
        }
        KeyCode::Char('f') | KeyCode::Enter => {
            app.session.toggle_fullscreen();
            app.session.model.ui.sixel_cleanup_frames = 1;
        }
        KeyCode::Char('c') | KeyCode::Char('y') => {
            let cmds = app.session.copy_link();
            app.dispatch(cmds);
        }
        KeyCode::Char('b') => {
            app.session.toggle_bookmark();
        }
        KeyCode::Char('r') => {
            let cmds = app.session.submit_report();
            app.dispatch(cmds);
        }
        KeyCode::Char('L') => {
            app.session.toggle_language();
        }
        KeyCode::Char('?') => app.session.model.ui.show_help = true,
        _ => {}
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    let count = app.session.bookmarks.len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('m') => app.session.model.menu.close(),
        KeyCode::Char('q') => app.session.model.ui.should_quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.session.model.menu.select_next(count),
        KeyCode::Up | KeyCode::Char('k') => app.session.model.menu.select_prev(),
        KeyCode::Enter => {
            let cmds = app.session.open_selected_bookmark();
            app.dispatch(cmds);
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.session.remove_selected_bookmark();
        }
        KeyCode::Char('C') => {
            if count > 0 {
                app.session.model.menu.confirm_clear = true;
            }
        }
        KeyCode::Char('s') => {
            app.session.toggle_map_style();
        }
        KeyCode::Char('L') => {
            app.session.toggle_language();
        }
        _ => {}
    }
}

fn handle_map_key(app: &mut App, key: KeyEvent) {
    let vim_mode = app.session.model.ui.vim_mode;
    let map = &mut app.session.model.map;

    match key.code {
        KeyCode::Char('q') => app.session.model.ui.should_quit = true,

        KeyCode::Left => map.pan(-PAN_STEP, 0.0),
        KeyCode::Right => map.pan(PAN_STEP, 0.0),
        KeyCode::Up => map.pan(0.0, PAN_STEP),
        KeyCode::Down => map.pan(0.0, -PAN_STEP),
        KeyCode::Char('h') if vim_mode => map.pan(-PAN_STEP, 0.0),
        KeyCode::Char('l') if vim_mode => map.pan(PAN_STEP, 0.0),
        KeyCode::Char('k') if vim_mode => map.pan(0.0, PAN_STEP),
        KeyCode::Char('j') if vim_mode => map.pan(0.0, -PAN_STEP),

        KeyCode::Char('+') | KeyCode::Char('=') => map.viewport.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => map.viewport.zoom_out(),

        // Back to the device position
        KeyCode::Char('.') => {
            if let Some(point) = map.device_position() {
                map.viewport.center = point;
            }
        }

        KeyCode::Enter => {
            let cmds = app.session.select_at_crosshair();
            app.dispatch(cmds);
        }

        KeyCode::Char('/') => app.session.model.ui.start_search(),
        KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.session.model.ui.start_search()
        }

        KeyCode::Char('m') => app.session.model.menu.toggle(),
        KeyCode::Char('s') => {
            app.session.toggle_map_style();
        }
        KeyCode::Char('L') => {
            app.session.toggle_language();
        }
        KeyCode::Char('R') => {
            let cmds = app.session.refresh_stations();
            app.dispatch(cmds);
        }
        KeyCode::Char('?') => app.session.model.ui.show_help = true,
        _ => {}
    }
}
