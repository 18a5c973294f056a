use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use appraisal_core::AppError;
use tracing::error;

mod types;

pub use types::ErrorResponse;

/// Message returned in place of internal error details.
pub const GENERIC_SERVER_ERROR: &str = "Server error. Please try again later.";

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self(AppError::Validation(value.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::Internal(detail) => {
                error!(error = %detail, "request failed with an internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_SERVER_ERROR.to_owned(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use appraisal_core::AppError;

    use super::ApiError;

    #[test]
    fn categories_map_to_status_codes() {
        for (error, status) in [
            (AppError::Validation("bad".to_owned()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("gone".to_owned()), StatusCode::NOT_FOUND),
            (AppError::Conflict("dup".to_owned()), StatusCode::CONFLICT),
            (AppError::Unauthorized("who".to_owned()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("no".to_owned()), StatusCode::FORBIDDEN),
            (
                AppError::Internal("pool timed out".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ] {
            assert_eq!(ApiError(error).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn internal_details_are_replaced_by_a_generic_message() {
        let response =
            ApiError(AppError::Internal("relation audit_records does not exist".to_owned()))
                .into_response();

        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("body should be json");
        };

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], super::GENERIC_SERVER_ERROR);
    }

    #[tokio::test]
    async fn validation_message_is_returned_verbatim() {
        let response = ApiError(AppError::Validation(
            "date query parameter is required".to_owned(),
        ))
        .into_response();

        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("body should be json");
        };

        assert_eq!(body["message"], "date query parameter is required");
    }
}
