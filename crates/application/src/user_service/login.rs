use appraisal_core::ClientMetadata;
use tracing::info;

use super::*;

const INVALID_CREDENTIALS: &str = "invalid email or password";

impl UserService {
    /// Authenticates a user with email and password.
    ///
    /// Unknown emails and wrong passwords fail with the same generic message.
    /// On success exactly one login event is recorded before returning; a
    /// failure to record it does not fail the login.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client: ClientMetadata,
    ) -> AppResult<AuthenticatedUser> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "email and password are required".to_owned(),
            ));
        }

        let Some(user) = self.user_repository.find_by_email(email.trim()).await? else {
            // Hash anyway so unknown emails cost the same as wrong passwords.
            let _ = self.password_hasher.hash_password(password);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        };

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;
        if !password_valid {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_owned()));
        }

        self.login_event_recorder
            .record_login(user.id, user.designation.clone(), client)
            .await;
        info!(user_id = %user.id, designation = %user.designation, "user logged in");

        Ok(AuthenticatedUser {
            profile: user.profile(),
            scores: user.scores,
        })
    }
}
