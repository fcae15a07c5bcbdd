use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use std::sync::Arc;
use std::time::Duration;

use plaza::api::ApiClient;
use plaza::app::{App, AppCommand};
use plaza::auth::PasswordAuthClient;
use plaza::config::{
    ClientConfig, ConfigOverrides, API_URL_ENV, AUTH_KEY_ENV, AUTH_URL_ENV, TIMEOUT_ENV,
};
use plaza::logging::{self, LogConfig};
use plaza::navigation::ScreenNavigator;
use plaza::signup::SignUpFormController;
use plaza::{terminal, ui};

/// Plaza - sign up and browse the community feed from your terminal
#[derive(Parser)]
#[command(name = "plaza")]
#[command(about = "Terminal client for the Plaza social feed")]
#[command(version)]
struct Cli {
    /// Base URL of the Plaza API
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Base URL of the hosted auth service
    #[arg(long, env = AUTH_URL_ENV)]
    auth_url: Option<String>,

    /// Public API key for the auth service
    #[arg(long, env = AUTH_KEY_ENV, hide_env_values = true)]
    auth_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = TIMEOUT_ENV)]
    timeout: Option<u64>,

    /// Start on the feed instead of the sign-up form
    #[arg(long)]
    feed: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

// Load environment variables from .env file
// This allows PLAZA_API_URL and friends to be set without command-line args
fn load_env() {
    let _ = dotenv::dotenv();
}

/// Run a command on its own task so rendering continues while it waits
fn spawn_command(command: AppCommand) {
    match command {
        AppCommand::Submit(signup) => {
            tokio::spawn(async move {
                if let Err(e) = signup.submit().await {
                    log::info!("Sign-up attempt ended: {}", e);
                }
            });
        }
        AppCommand::LoadFeed(feed) => {
            tokio::spawn(async move {
                feed.load().await;
            });
        }
        AppCommand::ReloadFeed(feed) => {
            tokio::spawn(async move {
                feed.reload().await;
            });
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so clap sees variables from .env
    load_env();

    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    logging::init_logging(&log_config).context("Failed to initialize logging")?;

    let config = ClientConfig::resolve(ConfigOverrides {
        api_url: cli.api_url,
        auth_url: cli.auth_url,
        auth_api_key: cli.auth_key,
        timeout_secs: cli.timeout,
    })?;
    log::info!("API at {}, auth at {}", config.api_url, config.auth_url);

    let api_client = Arc::new(
        ApiClient::with_timeout(config.api_url.clone(), config.request_timeout)
            .context("Failed to build API client")?,
    );
    let auth_client = Arc::new(
        PasswordAuthClient::with_timeout(
            config.auth_url.clone(),
            config.auth_api_key.clone(),
            config.request_timeout,
        )
        .context("Failed to build auth client")?,
    );
    let (navigator, routes) = ScreenNavigator::channel();

    let signup = SignUpFormController::new(api_client.clone(), auth_client, Arc::new(navigator));
    let mut app = App::new(signup, api_client, routes);
    app.log_config = log_config;

    if cli.feed {
        spawn_command(app.open_feed());
    }

    let mut tui = terminal::init()?;
    let result = run(&mut tui, &mut app).await;
    terminal::restore()?;
    result
}

async fn run(tui: &mut terminal::Tui, app: &mut App) -> Result<()> {
    while app.running {
        for command in app.apply_pending_routes() {
            spawn_command(command);
        }

        tui.draw(|frame| ui::render(app, frame))?;

        // Poll briefly so snapshots from background tasks show up promptly
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = app.handle_key_event(key)? {
                    spawn_command(command);
                }
            }
        }

        tokio::task::yield_now().await;
    }

    log::info!("Shutting down");
    Ok(())
}
