mod dropdown;
mod help;
mod helpers;
mod map;

use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if app.dropdown.open {
        dropdown::handle_dropdown_input(app, key);
    } else {
        map::handle_map_input(app, key);
    }
}
