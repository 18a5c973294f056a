use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use appraisal_application::{
    AuditRecord, AuditRecordFilter, AuditRecordRepository, LoginEvent, LoginEventFilter,
    LoginEventRepository, StoreHealth, UserDirectory, UserProfile, UserRecord, UserRepository,
};
use appraisal_core::{AppError, AppResult};
use appraisal_domain::{ScoreField, UserId};

/// In-memory document store backing every persistence port.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
    audit_records: RwLock<Vec<AuditRecord>>,
    login_events: RwLock<Vec<LoginEvent>>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditRecordRepository for InMemoryDocumentStore {
    async fn append_record(&self, record: AuditRecord) -> AppResult<()> {
        self.audit_records.write().await.push(record);
        Ok(())
    }

    async fn list_records(&self, filter: AuditRecordFilter) -> AppResult<Vec<AuditRecord>> {
        let records = self.audit_records.read().await;

        let mut values: Vec<AuditRecord> = records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        values.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));

        Ok(values)
    }
}

#[async_trait]
impl LoginEventRepository for InMemoryDocumentStore {
    async fn append_login_event(&self, event: LoginEvent) -> AppResult<()> {
        self.login_events.write().await.push(event);
        Ok(())
    }

    async fn list_login_events(&self, filter: LoginEventFilter) -> AppResult<Vec<LoginEvent>> {
        let events = self.login_events.read().await;

        let mut values: Vec<LoginEvent> = events
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();
        values.sort_by_key(LoginEvent::instant);

        Ok(values)
    }
}

#[async_trait]
impl UserRepository for InMemoryDocumentStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let email = email.trim().to_lowercase();
        let users = self.users.read().await;

        Ok(users
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn create(&self, user: UserRecord) -> AppResult<()> {
        let mut users = self.users.write().await;

        if users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        users.insert(user.id, user);
        Ok(())
    }

    async fn update(&self, user: UserRecord) -> AppResult<()> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|existing| existing.id != user.id && existing.email == user.email)
        {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let Some(existing) = users.get_mut(&user.id) else {
            return Err(AppError::NotFound(format!("user '{}' not found", user.id)));
        };

        let scores = std::mem::take(&mut existing.scores);
        *existing = UserRecord { scores, ..user };
        Ok(())
    }

    async fn set_score(&self, user_id: UserId, field: ScoreField, value: u32) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))?;

        user.scores.insert(field, value);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryDocumentStore {
    async fn find_profiles(&self, user_ids: &[UserId]) -> AppResult<Vec<UserProfile>> {
        let users = self.users.read().await;

        Ok(user_ids
            .iter()
            .filter_map(|user_id| users.get(user_id))
            .map(UserRecord::profile)
            .collect())
    }
}

#[async_trait]
impl StoreHealth for InMemoryDocumentStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
