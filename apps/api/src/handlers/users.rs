use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use appraisal_domain::{Actor, UserId};

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .create_user(actor, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = UserId::parse(&user_id)?;
    let user = state
        .user_service
        .update_user(actor, user_id, payload.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}
