//! PostgreSQL-backed user repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::warn;

use appraisal_application::{UserDirectory, UserProfile, UserRecord, UserRepository};
use appraisal_core::{AppError, AppResult};
use appraisal_domain::{Designation, EmailAddress, ScoreField, UserId};

/// PostgreSQL implementation of the user repository and directory ports.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    full_name: String,
    email: String,
    designation: String,
    department: Option<String>,
    password_hash: String,
    scores: Value,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            full_name: row.full_name,
            email: EmailAddress::new(row.email)?,
            designation: Designation::new(row.designation)?,
            department: row.department,
            password_hash: row.password_hash,
            scores: scores_from_json(row.id, &row.scores),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: uuid::Uuid,
    full_name: String,
    email: String,
    designation: String,
    department: Option<String>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.id),
            full_name: row.full_name,
            email: row.email,
            designation: row.designation,
            department: row.department,
        }
    }
}

mod account;
mod lookup;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn create(&self, user: UserRecord) -> AppResult<()> {
        self.create_impl(&user).await
    }

    async fn update(&self, user: UserRecord) -> AppResult<()> {
        self.update_impl(&user).await
    }

    async fn set_score(&self, user_id: UserId, field: ScoreField, value: u32) -> AppResult<()> {
        self.set_score_impl(user_id, field, value).await
    }
}

#[async_trait]
impl UserDirectory for PostgresUserRepository {
    async fn find_profiles(&self, user_ids: &[UserId]) -> AppResult<Vec<UserProfile>> {
        self.find_profiles_impl(user_ids).await
    }
}

fn email_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("an account with this email already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn scores_to_json(scores: &BTreeMap<ScoreField, u32>) -> Value {
    Value::Object(
        scores
            .iter()
            .map(|(field, value)| (field.as_str().to_owned(), Value::from(*value)))
            .collect::<Map<String, Value>>(),
    )
}

fn scores_from_json(user_id: uuid::Uuid, value: &Value) -> BTreeMap<ScoreField, u32> {
    let Some(object) = value.as_object() else {
        return BTreeMap::new();
    };

    object
        .iter()
        .filter_map(|(key, value)| {
            let field = key.parse::<ScoreField>().ok();
            let score = value.as_u64().and_then(|score| u32::try_from(score).ok());
            match (field, score) {
                (Some(field), Some(score)) => Some((field, score)),
                _ => {
                    warn!(%user_id, key = %key, "ignoring unrecognized stored score");
                    None
                }
            }
        })
        .collect()
}
