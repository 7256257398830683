#[allow(clippy::module_inception)]
mod config;

pub use config::{get_log_file, init_app_config, AppConfig};
