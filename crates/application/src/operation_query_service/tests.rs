use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use appraisal_core::{AppError, AppResult};
use appraisal_domain::{Actor, EntityKind, EntityRoot, OperationKind, ReportingCalendar, UserId};

use crate::{
    AuditDetails, AuditRecord, AuditRecordFilter, AuditRecordRepository, UserDirectory,
    UserProfile,
};

use super::{OperationQuery, OperationQueryService, SYSTEM_ACTOR_NAME};

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

struct FailingAuditRecordRepository;

#[async_trait]
impl AuditRecordRepository for FailingAuditRecordRepository {
    async fn append_record(&self, _record: AuditRecord) -> AppResult<()> {
        Err(AppError::Internal("connection reset".to_owned()))
    }

    async fn list_records(&self, _filter: AuditRecordFilter) -> AppResult<Vec<AuditRecord>> {
        Err(AppError::Internal("connection reset".to_owned()))
    }
}

struct FakeUserDirectory {
    profiles: Vec<UserProfile>,
}

#[async_trait]
impl UserDirectory for FakeUserDirectory {
    async fn find_profiles(&self, user_ids: &[UserId]) -> AppResult<Vec<UserProfile>> {
        Ok(self
            .profiles
            .iter()
            .filter(|profile| user_ids.contains(&profile.user_id))
            .cloned()
            .collect())
    }
}

fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    let Some(instant) = Utc.with_ymd_and_hms(2024, 4, day, hour, minute, 0).single() else {
        panic!("valid test instant");
    };
    instant
}

fn record(
    actor: Actor,
    entity_kind: EntityKind,
    operation_kind: OperationKind,
    timestamp: DateTime<Utc>,
) -> AuditRecord {
    let details = match operation_kind {
        OperationKind::Create => AuditDetails::Create {
            new_entity: json!({"title": "FDP"}),
        },
        OperationKind::Update => AuditDetails::Update {
            original_name: "FDP".to_owned(),
            original_entity: None,
            changed_fields: Default::default(),
        },
        OperationKind::Delete => AuditDetails::Delete {
            deleted_entity: json!({"title": "FDP"}),
        },
    };

    AuditRecord {
        record_id: Uuid::new_v4(),
        actor,
        target_id: Uuid::new_v4(),
        entity_kind,
        operation_kind,
        details,
        timestamp,
    }
}

fn profile(user_id: UserId) -> UserProfile {
    UserProfile {
        user_id,
        full_name: "Dr. Sunita Rao".to_owned(),
        email: "sunita@college.edu".to_owned(),
        designation: "Professor".to_owned(),
        department: Some("MECH".to_owned()),
    }
}

async fn service_with(
    records: Vec<AuditRecord>,
    profiles: Vec<UserProfile>,
) -> OperationQueryService {
    let repository = Arc::new(FakeAuditRecordRepository::default());
    repository.records.lock().await.extend(records);
    OperationQueryService::new(
        repository,
        Arc::new(FakeUserDirectory { profiles }),
        ReportingCalendar::default(),
    )
}

fn day(date: &str) -> OperationQuery {
    OperationQuery {
        date: Some(date.to_owned()),
        ..OperationQuery::default()
    }
}

#[tokio::test]
async fn groups_by_entity_kind_newest_first_with_resolved_actors() {
    let known = UserId::new();
    let gone = UserId::new();
    let Ok(activity) = EntityKind::embedded(EntityRoot::Others, "Activity") else {
        panic!("valid kind");
    };
    let service = service_with(
        vec![
            record(Actor::User(known), EntityKind::root(EntityRoot::Workshop), OperationKind::Create, utc(10, 3, 0)),
            record(Actor::User(gone), EntityKind::root(EntityRoot::Workshop), OperationKind::Update, utc(10, 7, 0)),
            record(Actor::System, activity, OperationKind::Delete, utc(10, 5, 0)),
        ],
        vec![profile(known)],
    )
    .await;

    let Ok(report) = service.operations_by_day(day("2024-04-10")).await else {
        panic!("report should build");
    };

    assert_eq!(report.date.to_string(), "2024-04-10");
    let keys: Vec<&str> = report.operations.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Others.Activity", "Workshop"]);

    let workshops = &report.operations["Workshop"];
    assert_eq!(workshops.len(), 2);
    assert_eq!(workshops[0].record.operation_kind, OperationKind::Update);
    assert_eq!(workshops[0].actor.full_name, "Unknown user");
    assert_eq!(workshops[0].actor.id, Some(gone));
    assert_eq!(workshops[1].actor.full_name, "Dr. Sunita Rao");
    assert_eq!(workshops[1].actor.department.as_deref(), Some("MECH"));

    let activities = &report.operations["Others.Activity"];
    assert_eq!(activities[0].actor.full_name, SYSTEM_ACTOR_NAME);
    assert_eq!(activities[0].actor.id, None);
}

#[tokio::test]
async fn day_boundary_follows_local_midnight() {
    // 18:29 UTC on the 9th is 23:59 local; 18:30 is 00:00 on the 10th.
    let service = service_with(
        vec![
            record(Actor::System, EntityKind::root(EntityRoot::Class), OperationKind::Create, utc(9, 18, 29)),
            record(Actor::System, EntityKind::root(EntityRoot::Class), OperationKind::Create, utc(9, 18, 30)),
        ],
        Vec::new(),
    )
    .await;

    let Ok(report) = service.operations_by_day(day("2024-04-10")).await else {
        panic!("report should build");
    };

    let classes = &report.operations["Class"];
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].record.timestamp, utc(9, 18, 30));
}

#[tokio::test]
async fn filters_narrow_the_result() {
    let actor = UserId::new();
    let service = service_with(
        vec![
            record(Actor::User(actor), EntityKind::root(EntityRoot::Award), OperationKind::Create, utc(12, 4, 0)),
            record(Actor::User(actor), EntityKind::root(EntityRoot::Award), OperationKind::Delete, utc(12, 5, 0)),
            record(Actor::System, EntityKind::root(EntityRoot::Award), OperationKind::Create, utc(12, 6, 0)),
            record(Actor::User(actor), EntityKind::root(EntityRoot::Article), OperationKind::Create, utc(12, 7, 0)),
        ],
        vec![profile(actor)],
    )
    .await;

    let Ok(report) = service
        .operations_by_day(OperationQuery {
            actor: Some(actor),
            operation_kind: Some(OperationKind::Create),
            entity_kind: Some(EntityKind::root(EntityRoot::Award)),
            ..day("2024-04-12")
        })
        .await
    else {
        panic!("report should build");
    };

    assert_eq!(report.operations.len(), 1);
    assert_eq!(report.operations["Award"].len(), 1);
    assert_eq!(report.operations["Award"][0].record.timestamp, utc(12, 4, 0));
}

#[tokio::test]
async fn missing_date_is_rejected() {
    let service = service_with(Vec::new(), Vec::new()).await;

    let result = service.operations_by_day(OperationQuery::default()).await;

    assert!(matches!(
        result,
        Err(AppError::Validation(ref message)) if message == "date query parameter is required"
    ));
}

#[tokio::test]
async fn empty_day_is_an_empty_mapping() {
    let service = service_with(Vec::new(), Vec::new()).await;

    let Ok(report) = service.operations_by_day(day("2024-04-01")).await else {
        panic!("report should build");
    };

    assert!(report.operations.is_empty());
}

#[tokio::test]
async fn store_failures_propagate() {
    let service = OperationQueryService::new(
        Arc::new(FailingAuditRecordRepository),
        Arc::new(FakeUserDirectory {
            profiles: Vec::new(),
        }),
        ReportingCalendar::default(),
    );

    let result = service.operations_by_day(day("2024-04-01")).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}
