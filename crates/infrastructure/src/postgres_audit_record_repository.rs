use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use appraisal_application::{AuditDetails, AuditRecord, AuditRecordFilter, AuditRecordRepository};
use appraisal_core::{AppError, AppResult};
use appraisal_domain::{Actor, EntityKind, OperationKind, UserId};

/// PostgreSQL-backed store of immutable audit records.
#[derive(Clone)]
pub struct PostgresAuditRecordRepository {
    pool: PgPool,
}

impl PostgresAuditRecordRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditRecordRow {
    id: Uuid,
    actor_id: Option<Uuid>,
    target_id: Uuid,
    entity_kind: String,
    operation_kind: String,
    details: serde_json::Value,
    timestamp: DateTime<Utc>,
}

impl TryFrom<AuditRecordRow> for AuditRecord {
    type Error = AppError;

    fn try_from(row: AuditRecordRow) -> Result<Self, Self::Error> {
        let details: AuditDetails = serde_json::from_value(row.details).map_err(|error| {
            AppError::Internal(format!(
                "audit record '{}' has malformed details: {error}",
                row.id
            ))
        })?;

        Ok(Self {
            record_id: row.id,
            actor: Actor::from_optional(row.actor_id.map(UserId::from_uuid)),
            target_id: row.target_id,
            entity_kind: row.entity_kind.parse::<EntityKind>()?,
            operation_kind: row.operation_kind.parse::<OperationKind>()?,
            details,
            timestamp: row.timestamp,
        })
    }
}

#[async_trait]
impl AuditRecordRepository for PostgresAuditRecordRepository {
    async fn append_record(&self, record: AuditRecord) -> AppResult<()> {
        let details = serde_json::to_value(&record.details).map_err(|error| {
            AppError::Internal(format!("failed to serialize audit details: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO audit_records (
                id,
                actor_id,
                target_id,
                entity_kind,
                operation_kind,
                details,
                "timestamp"
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.record_id)
        .bind(record.actor.user_id().map(|user_id| user_id.as_uuid()))
        .bind(record.target_id)
        .bind(record.entity_kind.as_storage())
        .bind(record.operation_kind.as_str())
        .bind(details)
        .bind(record.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append audit record: {error}")))?;

        Ok(())
    }

    async fn list_records(&self, filter: AuditRecordFilter) -> AppResult<Vec<AuditRecord>> {
        let rows = sqlx::query_as::<_, AuditRecordRow>(
            r#"
            SELECT
                id,
                actor_id,
                target_id,
                entity_kind,
                operation_kind,
                details,
                "timestamp"
            FROM audit_records
            WHERE "timestamp" >= $1
                AND "timestamp" < $2
                AND ($3::UUID IS NULL OR actor_id = $3)
                AND ($4::TEXT IS NULL OR operation_kind = $4)
                AND ($5::TEXT IS NULL OR entity_kind = $5)
            ORDER BY "timestamp" DESC, id
            "#,
        )
        .bind(filter.window.start())
        .bind(filter.window.end())
        .bind(filter.actor.map(|user_id| user_id.as_uuid()))
        .bind(filter.operation_kind.map(|kind| kind.as_str()))
        .bind(filter.entity_kind.map(|kind| kind.as_storage()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list audit records: {error}")))?;

        rows.into_iter().map(AuditRecord::try_from).collect()
    }
}
