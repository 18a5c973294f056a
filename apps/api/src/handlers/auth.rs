use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use appraisal_core::ClientMetadata;

use crate::dto::{LoginRequest, LoginResponse};
use crate::error::ApiResult;
use crate::state::AppState;

const FORWARDED_FOR: &str = "x-forwarded-for";
const DEVICE: &str = "x-device";

pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .user_service
        .login(&payload.email, &payload.password, client_metadata(&headers))
        .await?;

    Ok(Json(LoginResponse::from(user)))
}

fn client_metadata(headers: &HeaderMap) -> ClientMetadata {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned)
    };

    let ip_address = header(FORWARDED_FOR)
        .and_then(|value| value.split(',').next().map(|first| first.trim().to_owned()));

    ClientMetadata::new(ip_address, header(USER_AGENT.as_str()), header(DEVICE))
}
