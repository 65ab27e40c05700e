use crate::client::{HttpUpstream, UpstreamClient};
use crate::config::Config;
use crate::controller::refresh::{RefreshOutcome, refresh_champions, refresh_games};
use crate::storage::Store;
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

struct AppState {
    store: Arc<Store>,
    client: Arc<dyn UpstreamClient>,
    summoner_id: String,
}

/// Runs the control server until it is stopped via `POST /shutdown` or the
/// process is interrupted. Shutdown drains in-flight requests for up to
/// five seconds; a refresh task already running is detached and finishes
/// on its own.
///
/// # Errors
///
/// Will return `Err` if the listen address cannot be bound.
pub async fn run(config: &Config, store: Arc<Store>) -> std::io::Result<()> {
    let state = Data::new(AppState {
        store,
        client: Arc::new(HttpUpstream::new()),
        summoner_id: config.summoner_id.clone(),
    });

    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
    let shutdown_tx = Data::new(shutdown_tx);

    let addr = format!("0.0.0.0:{}", config.api_port);
    log::info!("starting API server at {addr}");

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(shutdown_tx.clone())
            .route("/refresh", web::post().to(refresh))
            .route("/health", web::get().to(health))
            .route("/shutdown", web::post().to(shutdown))
    })
    .bind(addr)?
    .shutdown_timeout(5)
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        if shutdown_rx.recv().await.is_some() {
            log::info!("shutdown requested, draining in-flight requests");
            handle.stop(true).await;
        }
    });

    server.await?;
    log::info!("server exited properly");
    Ok(())
}

/// Replies immediately, then refreshes champions and games in a detached
/// task. Failures there are observable only in the logs (and by the ledger
/// timestamp not advancing).
async fn refresh(state: Data<AppState>) -> impl Responder {
    let store = Arc::clone(&state.store);
    let client = Arc::clone(&state.client);
    let summoner_id = state.summoner_id.clone();

    tokio::spawn(async move {
        match refresh_champions(client.as_ref(), &store, Utc::now()).await {
            Ok(outcome) => log_outcome("champion", &outcome),
            Err(e) => log::error!("error fetching and storing champion data: {e}"),
        }
        match refresh_games(client.as_ref(), &store, &summoner_id, Utc::now()).await {
            Ok(outcome) => log_outcome("game", &outcome),
            Err(e) => log::error!("error fetching and storing game data: {e}"),
        }
    });

    HttpResponse::Accepted().json(json!({
        "status": "Data refresh initiated",
        "message": "Your data refresh request is being processed.",
    }))
}

async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

async fn shutdown(shutdown_tx: Data<mpsc::Sender<()>>) -> impl Responder {
    let _ = shutdown_tx.try_send(());
    HttpResponse::Accepted().body("shutting down")
}

fn log_outcome(what: &str, outcome: &RefreshOutcome) {
    match outcome {
        RefreshOutcome::Skipped => log::info!("{what} data is up to date"),
        RefreshOutcome::Completed(report) => log::info!(
            "{what} data refresh completed: {} rows inserted, {} entities skipped",
            report.inserted,
            report.failures.len()
        ),
    }
}
