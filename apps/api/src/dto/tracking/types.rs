use std::collections::BTreeMap;

use appraisal_application::AuditDetails;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string of the login statistics report.
#[derive(Debug, Default, Deserialize)]
pub struct LoginStatisticsParams {
    pub date: Option<String>,
    pub designation: Option<String>,
    pub hourly: Option<String>,
}

/// Query string of the operation statistics report.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationsStatisticsParams {
    pub date: Option<String>,
    pub user_id: Option<String>,
    pub operation: Option<String>,
    pub model_name: Option<String>,
}

/// Login report for one local day.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-statistics-response.ts"
)]
pub struct LoginStatisticsResponse {
    pub success: bool,
    pub date: String,
    pub total_logins: u64,
    pub total_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub by_designation: Option<Vec<DesignationTotalsResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub chart_data: Option<ChartDataResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub hourly_data: Option<HourlyDataResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub users_data: Option<Vec<UserLoginResponse>>,
}

/// Login totals of one designation.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/designation-totals-response.ts"
)]
pub struct DesignationTotalsResponse {
    pub designation: String,
    pub count: u64,
    pub total_logins: u64,
}

/// Chart-ready view of the designation totals.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/chart-data-response.ts"
)]
pub struct ChartDataResponse {
    pub labels: Vec<String>,
    pub datasets: ChartDatasetsResponse,
}

/// Parallel series aligned with [`ChartDataResponse::labels`].
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/chart-datasets-response.ts"
)]
pub struct ChartDatasetsResponse {
    pub counts: Vec<u64>,
    pub logins: Vec<u64>,
}

/// Hour-by-designation login matrix.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/hourly-data-response.ts"
)]
pub struct HourlyDataResponse {
    pub labels: Vec<String>,
    pub datasets: Vec<HourlySeriesResponse>,
}

/// One designation's logins per local hour.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/hourly-series-response.ts"
)]
pub struct HourlySeriesResponse {
    pub designation: String,
    pub data: Vec<u64>,
}

/// Per-user login totals.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-login-response.ts"
)]
pub struct UserLoginResponse {
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub count: u64,
    pub total_logins: u64,
    pub last_login: String,
}

/// Operation report for one local day.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/operations-statistics-response.ts"
)]
pub struct OperationsStatisticsResponse {
    pub success: bool,
    pub date: String,
    pub by_entity_kind: Vec<EntityKindTotalsResponse>,
    pub operations: BTreeMap<String, Vec<OperationRecordResponse>>,
}

/// Number of audit records of one entity kind.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/entity-kind-totals-response.ts"
)]
pub struct EntityKindTotalsResponse {
    pub model_name: String,
    pub count: u64,
}

/// API representation of one audit record.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/operation-record-response.ts"
)]
pub struct OperationRecordResponse {
    pub id: String,
    pub actor: ActorResponse,
    pub target_id: String,
    pub model_name: String,
    pub operation: String,
    #[ts(type = "Record<string, unknown>")]
    pub details: AuditDetails,
    pub timestamp: String,
}

/// Resolved actor of an audit record.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/actor-response.ts"
)]
pub struct ActorResponse {
    pub id: Option<String>,
    pub full_name: String,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
}
