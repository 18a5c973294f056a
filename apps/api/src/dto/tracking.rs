mod conversions;
mod types;

pub use types::{
    ActorResponse, ChartDataResponse, ChartDatasetsResponse, DesignationTotalsResponse,
    EntityKindTotalsResponse, HourlyDataResponse, HourlySeriesResponse, LoginStatisticsParams,
    LoginStatisticsResponse, OperationRecordResponse, OperationsStatisticsParams,
    OperationsStatisticsResponse, UserLoginResponse,
};
