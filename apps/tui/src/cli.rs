use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "bird_tracks", version, about = "Bird trajectory viewer")]
pub struct CliArgs {
    /// Print a track summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the tracking service address
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the species every request is scoped to
    #[arg(long, value_name = "NAME")]
    pub species: Option<String>,

    /// Identifier to summarize in headless mode (defaults to the first one)
    #[arg(long = "bird-id", value_name = "ID")]
    pub bird_id: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Override the log file used while the terminal UI is running
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.base_url {
            std::env::set_var("BIRD_TRACKS_BASE_URL", url);
        }
        if let Some(species) = &self.species {
            std::env::set_var("BIRD_TRACKS_SPECIES", species);
        }
        if let Some(timeout) = self.timeout {
            std::env::set_var("BIRD_TRACKS_TIMEOUT_SECS", timeout.to_string());
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("BIRD_TRACKS_LOG", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
