use bird_tracks_core::api::{DEFAULT_BASE_URL, DEFAULT_SPECIES};
use bird_tracks_core::Endpoints;
use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings resolved from `.env`, the environment and CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub base_url: String,
    pub species: String,
    pub request_timeout: Option<Duration>,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl AppConfig {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(self.base_url.clone(), self.species.clone())
    }
}

/// Initializes the application configuration
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    let base_url = env::var("BIRD_TRACKS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(eyre!("Base URL must start with http:// or https://: {base_url}"));
    }

    let species = env::var("BIRD_TRACKS_SPECIES")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_SPECIES.to_string());

    let request_timeout = match env::var("BIRD_TRACKS_TIMEOUT_SECS") {
        Ok(value) => {
            let seconds: u64 = value
                .trim()
                .parse()
                .map_err(|e| eyre!("Invalid BIRD_TRACKS_TIMEOUT_SECS {value:?}: {e}"))?;
            Some(Duration::from_secs(seconds))
        }
        Err(_) => None,
    };

    Ok(AppConfig {
        base_url,
        species,
        request_timeout,
        log_file: get_log_file(),
        debug: env::var_os("DEBUG").is_some(),
    })
}

/// Gets the file the terminal UI appends its log to
pub fn get_log_file() -> PathBuf {
    env::var("BIRD_TRACKS_LOG").map_or_else(|_| PathBuf::from("./bird_tracks.log"), PathBuf::from)
}
