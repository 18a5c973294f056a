use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use uuid::Uuid;

use appraisal_core::{AppError, AppResult};
use appraisal_domain::{Actor, EntityKind, EntityRoot, OperationKind, Snapshot, UserId};

use crate::{
    AuditDetails, AuditRecord, AuditRecordFilter, AuditRecordRepository, FieldChange,
    OperationRecorder,
};

use super::AuditFacade;

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

struct UnavailableAuditRecordRepository;

#[async_trait]
impl AuditRecordRepository for UnavailableAuditRecordRepository {
    async fn append_record(&self, _record: AuditRecord) -> AppResult<()> {
        Err(AppError::Internal("document store unavailable".to_owned()))
    }

    async fn list_records(&self, _filter: AuditRecordFilter) -> AppResult<Vec<AuditRecord>> {
        Err(AppError::Internal("document store unavailable".to_owned()))
    }
}

fn facade() -> (AuditFacade, Arc<FakeAuditRecordRepository>) {
    let repository = Arc::new(FakeAuditRecordRepository::default());
    let facade = AuditFacade::new(OperationRecorder::new(repository.clone()));
    (facade, repository)
}

fn snapshot(value: Value) -> Snapshot {
    Snapshot::from_json(value).unwrap_or_default()
}

#[tokio::test]
async fn update_with_one_changed_field_writes_one_record() {
    let (facade, repository) = facade();
    let actor = Actor::User(UserId::new());
    let target_id = Uuid::new_v4();

    let written = facade
        .record_update(
            actor,
            target_id,
            EntityKind::root(EntityRoot::Feedback),
            &snapshot(json!({"numberOfStudents": 40, "courseName": "DBMS", "semester": "II"})),
            &snapshot(json!({"numberOfStudents": 45, "courseName": "DBMS", "semester": "II"})),
        )
        .await;

    assert!(written);
    let records = repository.records.lock().await;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.actor, actor);
    assert_eq!(record.target_id, target_id);
    assert_eq!(record.operation_kind, OperationKind::Update);
    assert_eq!(record.entity_kind.as_storage(), "Feedback");

    let AuditDetails::Update { changed_fields, .. } = &record.details else {
        panic!("expected update payload");
    };
    assert_eq!(changed_fields.len(), 1);
    assert_eq!(
        changed_fields.get("numberOfStudents"),
        Some(&FieldChange {
            from: "40".to_owned(),
            to: "45".to_owned(),
        })
    );
}

#[tokio::test]
async fn no_op_update_writes_nothing_even_when_repeated() {
    let (facade, repository) = facade();
    let original = snapshot(json!({"title": "Paper", "journal": "IEEE"}));
    let updated = original.clone();

    for _ in 0..2 {
        let written = facade
            .record_update(
                Actor::System,
                Uuid::new_v4(),
                EntityKind::root(EntityRoot::Research),
                &original,
                &updated,
            )
            .await;
        assert!(written);
    }

    assert!(repository.records.lock().await.is_empty());
}

#[tokio::test]
async fn delete_payload_never_contains_the_password() {
    let (facade, repository) = facade();

    let written = facade
        .record_delete(
            Actor::User(UserId::new()),
            Uuid::new_v4(),
            EntityKind::root(EntityRoot::Research),
            &snapshot(json!({"title": "X", "password": "secret"})),
        )
        .await;

    assert!(written);
    let records = repository.records.lock().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].operation_kind, OperationKind::Delete);
    assert_eq!(
        records[0].details,
        AuditDetails::Delete {
            deleted_entity: json!({"title": "X"}),
        }
    );
}

#[tokio::test]
async fn create_without_actor_is_attributed_to_system() {
    let (facade, repository) = facade();
    let kind = EntityKind::embedded(EntityRoot::Others, "Activity");
    let Ok(kind) = kind else {
        panic!("valid embedded kind");
    };

    let written = facade
        .record_create(
            Actor::from_optional(None),
            Uuid::new_v4(),
            kind,
            &snapshot(json!({"activityDetails": "NSS camp", "revision": 0})),
        )
        .await;

    assert!(written);
    let records = repository.records.lock().await;
    assert_eq!(records[0].actor, Actor::System);
    assert_eq!(records[0].entity_kind.as_storage(), "Others.Activity");
    assert_eq!(
        records[0].details,
        AuditDetails::Create {
            new_entity: json!({"activityDetails": "NSS camp"}),
        }
    );
}

#[tokio::test]
async fn update_payload_keeps_sanitized_original_and_display_name() {
    let (facade, repository) = facade();

    facade
        .record_update(
            Actor::System,
            Uuid::new_v4(),
            EntityKind::root(EntityRoot::User),
            &snapshot(json!({"fullName": "Dr. Rao", "department": "CSE", "password": "hash"})),
            &snapshot(json!({"fullName": "Dr. Rao", "department": "ECE"})),
        )
        .await;

    let records = repository.records.lock().await;
    let AuditDetails::Update {
        original_name,
        original_entity,
        ..
    } = &records[0].details
    else {
        panic!("expected update payload");
    };
    assert_eq!(original_name, "Dr. Rao");
    assert_eq!(
        original_entity,
        &Some(json!({"fullName": "Dr. Rao", "department": "CSE"}))
    );
}

#[tokio::test]
async fn store_failure_is_swallowed_and_reported_as_false() {
    let facade = AuditFacade::new(OperationRecorder::new(Arc::new(
        UnavailableAuditRecordRepository,
    )));

    let written = facade
        .record_create(
            Actor::System,
            Uuid::new_v4(),
            EntityKind::root(EntityRoot::Workshop),
            &snapshot(json!({"title": "FDP"})),
        )
        .await;

    assert!(!written);
}

#[tokio::test]
async fn recorder_rejects_payload_that_contradicts_the_operation() {
    let repository = Arc::new(FakeAuditRecordRepository::default());
    let recorder = OperationRecorder::new(repository.clone());

    let written = recorder
        .record(
            Actor::System,
            Uuid::new_v4(),
            EntityKind::root(EntityRoot::Class),
            OperationKind::Create,
            AuditDetails::Delete {
                deleted_entity: json!({}),
            },
        )
        .await;

    assert!(!written);
    assert!(repository.records.lock().await.is_empty());
}
