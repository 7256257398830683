// Export our modules for use in the binary and integration tests
pub mod app;
pub mod cli;
pub mod config;
pub mod event;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use app::{App, TrackClient};
