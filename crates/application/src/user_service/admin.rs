use appraisal_domain::{Actor, validate_password};

use super::*;

/// Input payload for creating a faculty account.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Full display name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Designation label.
    pub designation: String,
    /// Optional department.
    pub department: Option<String>,
    /// Plaintext password.
    pub password: String,
}

/// Partial update of a faculty account. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New full display name.
    pub full_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New designation label.
    pub designation: Option<String>,
    /// New department.
    pub department: Option<String>,
    /// New plaintext password.
    pub password: Option<String>,
}

impl UserService {
    /// Creates a faculty account and records a CREATE audit entry.
    pub async fn create_user(&self, actor: Actor, input: CreateUserInput) -> AppResult<UserRecord> {
        let email = EmailAddress::new(input.email)?;
        let designation = Designation::new(input.designation)?;
        let full_name = required_name(input.full_name)?;
        validate_password(&input.password)?;

        if self
            .user_repository
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "a user with email '{}' already exists",
                email.as_str()
            )));
        }

        let user = UserRecord {
            id: UserId::new(),
            full_name,
            email,
            designation,
            department: optional_text(input.department),
            password_hash: self.password_hasher.hash_password(&input.password)?,
            scores: BTreeMap::new(),
        };
        self.user_repository.create(user.clone()).await?;

        self.audit
            .record_create(
                actor,
                user.id.as_uuid(),
                user_entity_kind(),
                &user.to_snapshot()?,
            )
            .await;

        Ok(user)
    }

    /// Applies a partial update and records an UPDATE audit entry when
    /// something changed.
    pub async fn update_user(
        &self,
        actor: Actor,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> AppResult<UserRecord> {
        let original = self.get_user(user_id).await?;
        let mut updated = original.clone();

        if let Some(full_name) = input.full_name {
            updated.full_name = required_name(full_name)?;
        }
        if let Some(email) = input.email {
            let email = EmailAddress::new(email)?;
            if email != original.email
                && self
                    .user_repository
                    .find_by_email(email.as_str())
                    .await?
                    .is_some()
            {
                return Err(AppError::Conflict(format!(
                    "a user with email '{}' already exists",
                    email.as_str()
                )));
            }
            updated.email = email;
        }
        if let Some(designation) = input.designation {
            updated.designation = Designation::new(designation)?;
        }
        if let Some(department) = input.department {
            updated.department = optional_text(Some(department));
        }
        if let Some(password) = input.password {
            validate_password(&password)?;
            updated.password_hash = self.password_hasher.hash_password(&password)?;
        }

        self.user_repository.update(updated.clone()).await?;

        self.audit
            .record_update(
                actor,
                user_id.as_uuid(),
                user_entity_kind(),
                &original.to_snapshot()?,
                &updated.to_snapshot()?,
            )
            .await;

        Ok(updated)
    }
}

fn required_name(value: String) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("full name must not be empty".to_owned()));
    }

    Ok(trimmed.to_owned())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
