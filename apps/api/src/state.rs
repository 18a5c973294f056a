use std::sync::Arc;

use appraisal_application::{
    FacultyScoreService, OperationQueryService, StoreHealth, TimeWindowAggregator, UserService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub faculty_score_service: FacultyScoreService,
    pub time_window_aggregator: TimeWindowAggregator,
    pub operation_query_service: OperationQueryService,
    pub store_health: Arc<dyn StoreHealth>,
    pub store_name: &'static str,
}
