//! Faculty account ports and application service.
//!
//! Owns credential checks and account administration. Every account change
//! is mirrored into the audit trail through [`AuditFacade`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use appraisal_core::{AppError, AppResult};
use appraisal_domain::{
    Designation, EmailAddress, EntityKind, EntityRoot, ReservedField, ScoreField, Snapshot, UserId,
};

use crate::{AuditFacade, LoginEventRecorder};

mod admin;
mod login;

pub use admin::{CreateUserInput, UpdateUserInput};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Full display name.
    pub full_name: String,
    /// Canonical email address.
    pub email: EmailAddress,
    /// Academic designation.
    pub designation: Designation,
    /// Department, if assigned.
    pub department: Option<String>,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Appraisal scores keyed by parameter.
    pub scores: BTreeMap<ScoreField, u32>,
}

impl UserRecord {
    /// Current score for `field`, zero when never set.
    #[must_use]
    pub fn score(&self, field: ScoreField) -> u32 {
        self.scores.get(&field).copied().unwrap_or(0)
    }

    /// Audit snapshot of the account. The password hash is never included.
    pub fn to_snapshot(&self) -> AppResult<Snapshot> {
        let mut snapshot = Snapshot::new()
            .with(ReservedField::PrimaryKey.as_str(), self.id.to_string())?
            .with("fullName", self.full_name.as_str())?
            .with("email", self.email.as_str())?
            .with("designation", self.designation.as_str())?
            .with("department", self.department.clone())?;

        for (field, value) in &self.scores {
            snapshot.insert(field.as_str(), *value)?;
        }

        Ok(snapshot)
    }

    /// Public profile projection.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.as_str().to_owned(),
            designation: self.designation.as_str().to_owned(),
            department: self.department.clone(),
        }
    }
}

/// Display projection of an account used by reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Unique user identifier.
    pub user_id: UserId,
    /// Full display name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Designation label.
    pub designation: String,
    /// Department, if assigned.
    pub department: Option<String>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Inserts a new user record.
    async fn create(&self, user: UserRecord) -> AppResult<()>;

    /// Replaces the stored profile and password hash of an existing user.
    async fn update(&self, user: UserRecord) -> AppResult<()>;

    /// Stores one appraisal score.
    async fn set_score(&self, user_id: UserId, field: ScoreField, value: u32) -> AppResult<()>;
}

/// Read port resolving user identifiers into display profiles.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns profiles for the known identifiers; unknown ids are omitted.
    async fn find_profiles(&self, user_ids: &[UserId]) -> AppResult<Vec<UserProfile>>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Result of a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Profile of the authenticated account.
    pub profile: UserProfile,
    /// Appraisal scores at login time.
    pub scores: BTreeMap<ScoreField, u32>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for faculty accounts.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    login_event_recorder: LoginEventRecorder,
    audit: AuditFacade,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        login_event_recorder: LoginEventRecorder,
        audit: AuditFacade,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            login_event_recorder,
            audit,
        }
    }

    /// Loads a user or fails with `NotFound`.
    pub async fn get_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))
    }
}

fn user_entity_kind() -> EntityKind {
    EntityKind::root(EntityRoot::User)
}
