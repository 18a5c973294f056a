use axum::Json;
use axum::extract::{Extension, State};
use appraisal_domain::{Actor, ScoreField, UserId};

use crate::dto::{ResetScoreRequest, ScoreChangeResponse, UpdateScoreRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn update_score_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<UpdateScoreRequest>,
) -> ApiResult<Json<ScoreChangeResponse>> {
    let user_id = UserId::parse(&payload.user_id)?;
    let field = payload.field.trim().parse::<ScoreField>()?;
    let change = state
        .faculty_score_service
        .update_score(actor, user_id, field, payload.value)
        .await?;

    Ok(Json(ScoreChangeResponse::from(change)))
}

pub async fn reset_score_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<ResetScoreRequest>,
) -> ApiResult<Json<ScoreChangeResponse>> {
    let user_id = UserId::parse(&payload.user_id)?;
    let field = payload.field.trim().parse::<ScoreField>()?;
    let change = state
        .faculty_score_service
        .reset_score(actor, user_id, field)
        .await?;

    Ok(Json(ScoreChangeResponse::from(change)))
}
