use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use appraisal_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

use cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let mutating_routes = Router::new()
        .route("/api/users", post(handlers::users::create_user_handler))
        .route(
            "/api/users/{user_id}",
            put(handlers::users::update_user_handler),
        )
        .route(
            "/api/faculty-scores",
            put(handlers::scores::update_score_handler)
                .delete(handlers::scores::reset_score_handler),
        )
        .route_layer(from_fn(middleware::resolve_actor));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(handlers::auth::login_handler))
        .route(
            "/api/tracking/login-statistics",
            get(handlers::tracking::login_statistics_handler),
        )
        .route(
            "/api/tracking/operations-statistics",
            get(handlers::tracking::operations_statistics_handler),
        )
        .merge(mutating_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
