use std::sync::Arc;

use appraisal_core::{AppError, AppResult};
use appraisal_domain::{Actor, EntityKind, EntityRoot, ScoreField, Snapshot, UserId};

use crate::{AuditFacade, UserRepository};

/// Outcome of a score update or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChange {
    /// Parameter that changed.
    pub field: ScoreField,
    /// Score before the change.
    pub previous: u32,
    /// Score after the change.
    pub current: u32,
}

/// Updates per-parameter appraisal scores on faculty accounts.
#[derive(Clone)]
pub struct FacultyScoreService {
    user_repository: Arc<dyn UserRepository>,
    audit: AuditFacade,
}

impl FacultyScoreService {
    /// Creates a score service.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>, audit: AuditFacade) -> Self {
        Self {
            user_repository,
            audit,
        }
    }

    /// Sets a score, clamped into the parameter's range.
    pub async fn update_score(
        &self,
        actor: Actor,
        user_id: UserId,
        field: ScoreField,
        requested: i64,
    ) -> AppResult<ScoreChange> {
        let previous = self.current_score(user_id, field).await?;
        let current = field.bounded(requested);
        self.user_repository
            .set_score(user_id, field, current)
            .await?;

        let original = Snapshot::new().with(field.as_str(), previous)?;
        let updated = Snapshot::new()
            .with(field.as_str(), current)?
            .with("parameter", field.label())?;
        self.audit
            .record_update(
                actor,
                user_id.as_uuid(),
                score_entity_kind()?,
                &original,
                &updated,
            )
            .await;

        Ok(ScoreChange {
            field,
            previous,
            current,
        })
    }

    /// Resets a score to zero and records the previous value as deleted.
    pub async fn reset_score(
        &self,
        actor: Actor,
        user_id: UserId,
        field: ScoreField,
    ) -> AppResult<ScoreChange> {
        let previous = self.current_score(user_id, field).await?;
        self.user_repository.set_score(user_id, field, 0).await?;

        let removed = Snapshot::new()
            .with(field.as_str(), previous)?
            .with("parameter", field.label())?;
        self.audit
            .record_delete(actor, user_id.as_uuid(), score_entity_kind()?, &removed)
            .await;

        Ok(ScoreChange {
            field,
            previous,
            current: 0,
        })
    }

    async fn current_score(&self, user_id: UserId, field: ScoreField) -> AppResult<u32> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .map(|user| user.score(field))
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))
    }
}

fn score_entity_kind() -> AppResult<EntityKind> {
    EntityKind::embedded(EntityRoot::User, "FacultyScore")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    use appraisal_core::{AppError, AppResult};
    use appraisal_domain::{Actor, Designation, EmailAddress, OperationKind, ScoreField, UserId};

    use crate::{
        AuditDetails, AuditFacade, AuditRecord, AuditRecordFilter, AuditRecordRepository,
        OperationRecorder, UserRecord, UserRepository,
    };

    use super::FacultyScoreService;

    #[derive(Default)]
    struct FakeUserRepository {
        users: Mutex<BTreeMap<UserId, UserRecord>>,
    }

    #[async_trait]
    impl UserRepository for FakeUserRepository {
        async fn find_by_email(&self, _email: &str) -> AppResult<Option<UserRecord>> {
            Ok(None)
        }

        async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
            Ok(self.users.lock().await.get(&user_id).cloned())
        }

        async fn create(&self, user: UserRecord) -> AppResult<()> {
            self.users.lock().await.insert(user.id, user);
            Ok(())
        }

        async fn update(&self, user: UserRecord) -> AppResult<()> {
            self.users.lock().await.insert(user.id, user);
            Ok(())
        }

        async fn set_score(&self, user_id: UserId, field: ScoreField, value: u32) -> AppResult<()> {
            let mut users = self.users.lock().await;
            let user = users
                .get_mut(&user_id)
                .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))?;
            user.scores.insert(field, value);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeAuditRecordRepository {
        records: Mutex<Vec<AuditRecord>>,
    }

    #[async_trait]
    impl AuditRecordRepository for FakeAuditRecordRepository {
        async fn append_record(&self, record: AuditRecord) -> AppResult<()> {
            self.records.lock().await.push(record);
            Ok(())
        }

        async fn list_records(&self, filter: AuditRecordFilter) -> AppResult<Vec<AuditRecord>> {
            Ok(self
                .records
                .lock()
                .await
                .iter()
                .filter(|record| filter.matches(record))
                .cloned()
                .collect())
        }
    }

    async fn setup(
        scores: &[(ScoreField, u32)],
    ) -> (
        FacultyScoreService,
        UserId,
        Arc<FakeUserRepository>,
        Arc<FakeAuditRecordRepository>,
    ) {
        let users = Arc::new(FakeUserRepository::default());
        let audit_records = Arc::new(FakeAuditRecordRepository::default());
        let user = UserRecord {
            id: UserId::new(),
            full_name: "Dr. Kavya Menon".to_owned(),
            email: EmailAddress::new("kavya@college.edu")
                .unwrap_or_else(|_| panic!("valid email")),
            designation: Designation::new("Assistant Professor")
                .unwrap_or_else(|_| panic!("valid designation")),
            department: None,
            password_hash: String::new(),
            scores: scores.iter().copied().collect(),
        };
        let user_id = user.id;
        users.users.lock().await.insert(user_id, user);

        let service = FacultyScoreService::new(
            users.clone(),
            AuditFacade::new(OperationRecorder::new(audit_records.clone())),
        );
        (service, user_id, users, audit_records)
    }

    #[tokio::test]
    async fn update_clamps_and_records_previous_and_new_value() {
        let (service, user_id, users, audit_records) =
            setup(&[(ScoreField::WosPapers, 12)]).await;
        let actor = Actor::User(UserId::new());

        let change = service
            .update_score(actor, user_id, ScoreField::WosPapers, 95)
            .await;

        let Ok(change) = change else {
            panic!("score update should succeed");
        };
        assert_eq!(change.previous, 12);
        assert_eq!(change.current, 60);
        assert_eq!(
            users.users.lock().await[&user_id].score(ScoreField::WosPapers),
            60
        );

        let records = audit_records.records.lock().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operation_kind, OperationKind::Update);
        assert_eq!(records[0].entity_kind.as_storage(), "User.FacultyScore");
        let AuditDetails::Update { changed_fields, .. } = &records[0].details else {
            panic!("expected update payload");
        };
        let Some(change) = changed_fields.get("WosMarks") else {
            panic!("score change expected");
        };
        assert_eq!((change.from.as_str(), change.to.as_str()), ("12", "60"));
        let Some(parameter) = changed_fields.get("parameter") else {
            panic!("parameter label expected");
        };
        assert_eq!(parameter.from, "null");
        assert_eq!(parameter.to, ScoreField::WosPapers.label());
    }

    #[tokio::test]
    async fn negative_scores_clamp_to_zero() {
        let (service, user_id, _, _) = setup(&[]).await;

        let change = service
            .update_score(Actor::System, user_id, ScoreField::SciPapers, -5)
            .await;

        assert!(matches!(change, Ok(change) if change.current == 0));
    }

    #[tokio::test]
    async fn reset_records_a_delete_with_the_previous_value() {
        let (service, user_id, users, audit_records) =
            setup(&[(ScoreField::Proposals, 7)]).await;

        let change = service
            .reset_score(Actor::System, user_id, ScoreField::Proposals)
            .await;

        assert!(matches!(change, Ok(change) if change.previous == 7 && change.current == 0));
        assert_eq!(
            users.users.lock().await[&user_id].score(ScoreField::Proposals),
            0
        );
        let records = audit_records.records.lock().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].actor, Actor::System);
        assert_eq!(
            records[0].details,
            AuditDetails::Delete {
                deleted_entity: json!({
                    "ProposalMarks": 7,
                    "parameter": ScoreField::Proposals.label(),
                }),
            }
        );
    }

    #[tokio::test]
    async fn unknown_faculty_is_not_found() {
        let (service, _, _, audit_records) = setup(&[]).await;

        let result = service
            .update_score(Actor::System, UserId::new(), ScoreField::SciPapers, 5)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(audit_records.records.lock().await.is_empty());
    }
}
