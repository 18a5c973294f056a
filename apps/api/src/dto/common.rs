use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: StoreHealthStatus,
}

/// Document store reachability.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/store-health-status.ts"
)]
pub struct StoreHealthStatus {
    pub name: &'static str,
    pub status: &'static str,
}
