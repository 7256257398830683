use bird_tracks::cli::CliArgs;
use bird_tracks::config::init_app_config;
use bird_tracks::logging::init_logging;
use bird_tracks::{event, terminal, App, TrackClient};
use clap::Parser;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;

    // The UI needs a terminal; anything else gets the printed summary
    let headless = args.headless || !is_terminal();
    init_logging(&config, !headless)?;

    let client = TrackClient::new(config.endpoints(), config.request_timeout)?;
    log::info!("Using tracking service at {}", client.endpoints().base_url());

    if headless {
        return event::run_headless(&client, args.json, args.bird_id.as_deref()).await;
    }

    let mut app = App::new(client);
    app.mount();

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app);
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
