use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::{HealthResponse, StoreHealthStatus};
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, store_status, http_status) = match state.store_health.ping().await {
        Ok(()) => ("ok", "ok", StatusCode::OK),
        Err(error) => {
            warn!(store = state.store_name, error = %error, "document store ping failed");
            ("degraded", "unavailable", StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            store: StoreHealthStatus {
                name: state.store_name,
                status: store_status,
            },
        }),
    )
}
