use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

use appraisal_domain::{Actor, EntityKind, OperationKind};

use crate::{AuditDetails, AuditRecord, AuditRecordRepository};

/// Persists single immutable audit records.
///
/// Failures are logged and reported as `false`; they never propagate to the
/// business operation that triggered the record.
#[derive(Clone)]
pub struct OperationRecorder {
    repository: Arc<dyn AuditRecordRepository>,
}

impl OperationRecorder {
    /// Creates a recorder from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditRecordRepository>) -> Self {
        Self { repository }
    }

    /// Appends one audit record stamped with the current instant.
    pub async fn record(
        &self,
        actor: Actor,
        target_id: Uuid,
        entity_kind: EntityKind,
        operation_kind: OperationKind,
        details: AuditDetails,
    ) -> bool {
        if details.operation_kind() != operation_kind {
            error!(
                entity_kind = %entity_kind,
                operation = operation_kind.as_str(),
                payload = details.operation_kind().as_str(),
                "audit payload does not match operation kind"
            );
            return false;
        }

        let record = AuditRecord {
            record_id: Uuid::new_v4(),
            actor,
            target_id,
            entity_kind,
            operation_kind,
            details,
            timestamp: Utc::now(),
        };
        let entity_kind = record.entity_kind.clone();

        match self.repository.append_record(record).await {
            Ok(()) => {
                debug!(
                    entity_kind = %entity_kind,
                    operation = operation_kind.as_str(),
                    %target_id,
                    %actor,
                    "operation logged"
                );
                true
            }
            Err(err) => {
                error!(
                    entity_kind = %entity_kind,
                    operation = operation_kind.as_str(),
                    %target_id,
                    error = %err,
                    "failed to log operation"
                );
                false
            }
        }
    }
}
