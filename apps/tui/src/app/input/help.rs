use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    // '?' is a legitimate filter character while the dropdown is open
    if key == KeyCode::F(1) || (key == KeyCode::Char('?') && !app.dropdown.open) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}
