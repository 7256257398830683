use crate::app::state::App;
use crossterm::event::KeyCode;

/// Fraction of the visible span moved per key press.
const PAN_STEP: f64 = 0.1;

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if !app.tracker.identifiers().is_empty() {
                app.open_dropdown();
            }
        }
        KeyCode::Left => pan(app, -PAN_STEP, 0.0),
        KeyCode::Right => pan(app, PAN_STEP, 0.0),
        KeyCode::Up => pan(app, 0.0, PAN_STEP),
        KeyCode::Down => pan(app, 0.0, -PAN_STEP),
        KeyCode::Char('+' | '=') => {
            if let Some(map) = app.map.current_mut() {
                map.viewport.zoom_in();
            }
        }
        KeyCode::Char('-') => {
            if let Some(map) = app.map.current_mut() {
                map.viewport.zoom_out();
            }
        }
        KeyCode::Char('r') => {
            if let Some(map) = app.map.current_mut() {
                map.reset_view();
            }
        }
        _ => {}
    }
}

fn pan(app: &mut App, east: f64, north: f64) {
    if let Some(map) = app.map.current_mut() {
        map.viewport.pan(east, north);
    }
}
