use std::collections::BTreeMap;

use appraisal_application::{AuthenticatedUser, CreateUserInput, UpdateUserInput, UserRecord};
use appraisal_domain::ScoreField;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for account creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub email: String,
    pub designation: String,
    #[serde(default)]
    pub department: Option<String>,
    pub password: String,
}

/// Incoming payload for a partial account update.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-user-request.ts"
)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// API representation of a faculty account.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub designation: String,
    pub department: Option<String>,
    pub scores: BTreeMap<String, u32>,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            full_name: value.full_name,
            email: value.email,
            designation: value.designation,
            department: value.department,
            password: value.password,
        }
    }
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            full_name: value.full_name,
            email: value.email,
            designation: value.designation,
            department: value.department,
            password: value.password,
        }
    }
}

impl From<UserRecord> for UserResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.id.to_string(),
            full_name: value.full_name,
            email: value.email.as_str().to_owned(),
            designation: value.designation.as_str().to_owned(),
            department: value.department,
            scores: score_map(&value.scores),
        }
    }
}

impl From<AuthenticatedUser> for UserResponse {
    fn from(value: AuthenticatedUser) -> Self {
        Self {
            id: value.profile.user_id.to_string(),
            full_name: value.profile.full_name,
            email: value.profile.email,
            designation: value.profile.designation,
            department: value.profile.department,
            scores: score_map(&value.scores),
        }
    }
}

fn score_map(scores: &BTreeMap<ScoreField, u32>) -> BTreeMap<String, u32> {
    scores
        .iter()
        .map(|(field, value)| (field.as_str().to_owned(), *value))
        .collect()
}
