use crate::config::AppConfig;
use color_eyre::Result;
use env_logger::{Env, Target};
use std::fs::OpenOptions;

/// Installs the global logger.
///
/// The terminal UI owns stdout and stderr while it runs, so in that mode log
/// records are appended to the configured log file instead.
pub fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let default_level = if config.debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_level));

    if to_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init()?;
    log::debug!("Logging initialized (level {default_level})");
    Ok(())
}
