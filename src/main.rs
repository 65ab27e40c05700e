use rusty_rift::args::{self, Args, Command, DataAction, ServerAction};
use rusty_rift::client::HttpUpstream;
use rusty_rift::config::Config;
use rusty_rift::controller::refresh::{RefreshOutcome, refresh_champions, refresh_games};
use rusty_rift::server;
use rusty_rift::storage::Store;

use chrono::Utc;
use std::sync::Arc;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = args::args_checks();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("error loading config: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args, &config).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Champions { action } => {
            let store = Store::open(&config.database_path)?;
            match action {
                DataAction::Fetch => {
                    let client = HttpUpstream::new();
                    let outcome = refresh_champions(&client, &store, Utc::now()).await?;
                    report("champion", &outcome);
                }
                DataAction::Wipe => {
                    store.clear_champion_data()?;
                    log::info!("champion data cleared");
                }
            }
        }
        Command::Games { action } => {
            let store = Store::open(&config.database_path)?;
            match action {
                DataAction::Fetch => {
                    let client = HttpUpstream::new();
                    let outcome =
                        refresh_games(&client, &store, &config.summoner_id, Utc::now()).await?;
                    report("game", &outcome);
                }
                DataAction::Wipe => {
                    store.clear_game_data()?;
                    log::info!("game data cleared");
                }
            }
        }
        Command::Server { action } => match action {
            ServerAction::Start => {
                let store = Arc::new(Store::open(&config.database_path)?);
                server::run(config, store).await?;
            }
            // Stopping a server running in another process needs no store.
            ServerAction::Stop => stop_server(config).await?,
        },
    }

    Ok(())
}

fn report(what: &str, outcome: &RefreshOutcome) {
    match outcome {
        RefreshOutcome::Skipped => log::info!("{what} data is up to date"),
        RefreshOutcome::Completed(report) => {
            log::info!(
                "data fetching and insertion completed: {} rows inserted, {} entities skipped",
                report.inserted,
                report.failures.len()
            );
        }
    }
}

async fn stop_server(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!("http://127.0.0.1:{}/shutdown", config.api_port);
    reqwest::Client::new()
        .post(&url)
        .send()
        .await?
        .error_for_status()?;
    log::info!("shutdown request accepted");
    Ok(())
}
