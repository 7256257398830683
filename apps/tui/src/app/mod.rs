// App module for bird_tracks
// Handles application state, service access and key handling

pub mod actions;
pub mod input;
pub mod state;

pub use actions::TrackClient;
pub use input::handle_input;
pub use state::{App, Dropdown};
