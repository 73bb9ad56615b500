use anyhow::Result;
use chrono::Duration;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod ai_map;
mod config;
mod error;
mod middleware;
mod models;
mod routes;
mod service;
mod state;

use common::store::SessionStore;

use crate::{ai_map::AiMapper, config::ApiConfig, service::ForecastService, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting API service");

    let config = ApiConfig::from_env();

    let store = SessionStore::new(Duration::seconds(config.session_ttl_secs));
    let forecast_service = ForecastService::new(store.clone());
    let ai = AiMapper::new(&config);

    if config.openai_api_key.is_none() {
        info!("AI header mapping disabled: no API key configured");
    }

    let app_state = AppState {
        store,
        forecast_service,
        ai,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("API service listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
