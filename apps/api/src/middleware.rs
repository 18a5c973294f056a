use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use appraisal_core::{AppError, AppResult};
use appraisal_domain::{Actor, UserId};

use crate::error::ApiResult;

/// Header carrying the acting user's identifier on mutating requests.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Resolves the acting user and stores it as a request extension.
pub async fn resolve_actor(mut request: Request, next: Next) -> ApiResult<Response> {
    let actor = actor_from_headers(request.headers())?;
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

fn actor_from_headers(headers: &HeaderMap) -> AppResult<Actor> {
    let Some(value) = headers.get(ACTOR_HEADER) else {
        return Ok(Actor::System);
    };

    let raw = value
        .to_str()
        .map_err(|_| AppError::Validation(format!("{ACTOR_HEADER} header must be a UUID")))?;
    if raw.trim().is_empty() {
        return Ok(Actor::System);
    }

    UserId::parse(raw).map(Actor::User)
}
