use axum::Json;
use axum::extract::State;
use appraisal_application::OperationQuery;

use crate::dto::{
    LoginStatisticsParams, LoginStatisticsResponse, OperationsStatisticsParams,
    OperationsStatisticsResponse,
};
use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::state::AppState;

pub async fn login_statistics_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LoginStatisticsParams>,
) -> ApiResult<Json<LoginStatisticsResponse>> {
    let statistics = state
        .time_window_aggregator
        .login_statistics(params.into())
        .await?;

    Ok(Json(LoginStatisticsResponse::from(statistics)))
}

pub async fn operations_statistics_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<OperationsStatisticsParams>,
) -> ApiResult<Json<OperationsStatisticsResponse>> {
    let query = OperationQuery::try_from(params)?;
    let activity = state
        .time_window_aggregator
        .operation_activity(&query)
        .await?;
    let report = state.operation_query_service.operations_by_day(query).await?;

    Ok(Json(OperationsStatisticsResponse::from_report(report, activity)))
}
