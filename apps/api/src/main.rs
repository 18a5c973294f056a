//! Faculty appraisal API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod extract;
mod handlers;
mod middleware;
mod state;

use appraisal_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, StoreConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    if config.migrate_only {
        if let StoreConfig::Postgres {
            database_url,
            max_connections,
        } = &config.store
        {
            api_services::connect_and_migrate(database_url, *max_connections).await?;
        }
        info!("database migrations applied successfully");
        return Ok(());
    }

    let app_state = api_services::build_app_state(&config).await?;
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, store = config.store.label(), "appraisal-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
