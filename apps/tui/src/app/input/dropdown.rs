use crate::app::input::helpers::{clamp_forward, wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

const PAGE_ROWS: usize = 5;

pub fn handle_dropdown_input(app: &mut App, key: KeyCode) {
    let total_rows = app.filtered_identifiers().len();
    let highlighted = app.dropdown.highlighted;

    match key {
        KeyCode::Esc => app.close_dropdown(),
        KeyCode::Enter => app.confirm_dropdown(),
        KeyCode::Up => {
            app.dropdown.highlighted = wrap_decrement(highlighted, total_rows);
        }
        KeyCode::Down => {
            app.dropdown.highlighted = wrap_increment(highlighted, total_rows);
        }
        KeyCode::PageUp => {
            app.dropdown.highlighted = highlighted.saturating_sub(PAGE_ROWS);
        }
        KeyCode::PageDown => {
            app.dropdown.highlighted = clamp_forward(highlighted, PAGE_ROWS, total_rows);
        }
        KeyCode::Home => {
            app.dropdown.highlighted = 0;
        }
        KeyCode::End => {
            app.dropdown.highlighted = total_rows.saturating_sub(1);
        }
        KeyCode::Backspace => {
            app.dropdown.filter.pop();
            app.dropdown.highlighted = 0;
        }
        KeyCode::Char(ch) => {
            app.dropdown.filter.push(ch);
            app.dropdown.highlighted = 0;
        }
        _ => {}
    }
}
