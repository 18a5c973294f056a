use axum::extract::FromRequestParts;

use crate::error::ApiError;

/// Query string extractor whose rejection uses the API error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use axum::extract::FromRequestParts;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    use super::ApiQuery;
    use crate::dto::OperationsStatisticsParams;
    use crate::error::ApiError;

    async fn extract(uri: &str) -> Result<ApiQuery<OperationsStatisticsParams>, ApiError> {
        let Ok(request) = Request::builder().uri(uri).body(()) else {
            panic!("valid test request");
        };
        let (mut parts, ()) = request.into_parts();
        ApiQuery::<OperationsStatisticsParams>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn well_formed_query_is_extracted() {
        let Ok(ApiQuery(params)) =
            extract("/api/tracking/operations-statistics?date=2024-04-10&modelName=User").await
        else {
            panic!("query should extract");
        };

        assert_eq!(params.date.as_deref(), Some("2024-04-10"));
        assert_eq!(params.model_name.as_deref(), Some("User"));
    }

    #[tokio::test]
    async fn undecodable_query_is_a_json_bad_request() {
        let Err(error) =
            extract("/api/tracking/operations-statistics?date=2024-04-10&date=2024-04-11").await
        else {
            panic!("duplicate date should be rejected");
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("body should be json");
        };
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some_and(|message| message.contains("date")));
    }
}
