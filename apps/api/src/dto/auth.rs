use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::users::UserResponse;

/// Incoming login payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub success: bool,
    pub role: String,
    pub user: UserResponse,
}

impl From<appraisal_application::AuthenticatedUser> for LoginResponse {
    fn from(value: appraisal_application::AuthenticatedUser) -> Self {
        let user = UserResponse::from(value);
        Self {
            success: true,
            role: user.designation.clone(),
            user,
        }
    }
}
