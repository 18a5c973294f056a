use appraisal_application::ScoreChange;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for a score update.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-score-request.ts"
)]
pub struct UpdateScoreRequest {
    pub user_id: String,
    pub field: String,
    pub value: i64,
}

/// Incoming payload for a score reset.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reset-score-request.ts"
)]
pub struct ResetScoreRequest {
    pub user_id: String,
    pub field: String,
}

/// Result of a score update or reset.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/score-change-response.ts"
)]
pub struct ScoreChangeResponse {
    pub success: bool,
    pub field: String,
    pub parameter: String,
    pub max_score: u32,
    pub previous: u32,
    pub current: u32,
}

impl From<ScoreChange> for ScoreChangeResponse {
    fn from(value: ScoreChange) -> Self {
        Self {
            success: true,
            field: value.field.as_str().to_owned(),
            parameter: value.field.label().to_owned(),
            max_score: value.field.max_score(),
            previous: value.previous,
            current: value.current,
        }
    }
}
