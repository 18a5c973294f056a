mod auth;
mod common;
mod scores;
mod tracking;
mod users;

pub use auth::{LoginRequest, LoginResponse};
pub use common::{HealthResponse, StoreHealthStatus};
pub use scores::{ResetScoreRequest, ScoreChangeResponse, UpdateScoreRequest};
pub use tracking::{
    ActorResponse, ChartDataResponse, ChartDatasetsResponse, DesignationTotalsResponse,
    EntityKindTotalsResponse, HourlyDataResponse, HourlySeriesResponse, LoginStatisticsParams,
    LoginStatisticsResponse, OperationRecordResponse, OperationsStatisticsParams,
    OperationsStatisticsResponse, UserLoginResponse,
};
pub use users::{CreateUserRequest, UpdateUserRequest, UserResponse};
