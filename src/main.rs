//! Weather Dashboard - current weather and a 5-day temperature chart
//!
//! A terminal UI application that shows the weather for a city, typed in or
//! detected from the machine's IP address.

use std::error::Error;
use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use weatherdash::app::App;
use weatherdash::cache::CacheManager;
use weatherdash::cli::{Cli, StartupConfig};
use weatherdash::config::Config;
use weatherdash::data::{GeoLocator, OpenWeatherClient};
use weatherdash::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Builds the weather client from configuration
fn build_client(config: &Config, api_key: &str) -> OpenWeatherClient {
    let client = OpenWeatherClient::new(api_key)
        .with_endpoints(config.api.weather_url.as_str(), config.api.forecast_url.as_str());

    if !config.cache.enabled {
        info!("Response cache disabled");
        return client;
    }

    match CacheManager::new() {
        Some(cache) => {
            info!("Caching responses in {}", cache.dir().display());
            client.with_cache(cache, config.cache_ttl())
        }
        None => {
            warn!("No cache directory available, running without cache");
            client
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let startup = StartupConfig::from_cli(&cli)?;

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    let api_key = config.api_key()?;

    if let Some(path) = logging::init(&config.log.level) {
        info!("Logging to {}", path.display());
    }

    let client = build_client(&config, api_key);
    let locator = GeoLocator::with_url(config.api.location_url.as_str());
    let mut app = App::new(client, locator, startup);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initial render to show loading state, then the first load
    terminal.draw(|f| ui::render(f, &app))?;
    app.run_pending().await;

    // Main event loop
    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }

        if app.pending.is_some() {
            // Show the fetching status before blocking on the network
            terminal.draw(|f| ui::render(f, &app))?;
            app.run_pending().await;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    info!("Exiting");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("weatherdash: {}", e);
            ExitCode::FAILURE
        }
    }
}
