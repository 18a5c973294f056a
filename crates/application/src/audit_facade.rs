//! Entry points that domain handlers call after a business mutation.

use tracing::debug;
use uuid::Uuid;

use appraisal_domain::{Actor, EntityKind, OperationKind, Snapshot};

use crate::change_differ::diff;
use crate::{AuditDetails, OperationRecorder};

/// Records create, update and delete operations for the audit trail.
///
/// Every method is best-effort: the return value reports whether the audit
/// trail is consistent with the call (written, or intentionally skipped), and
/// no error is ever raised to the caller.
#[derive(Clone)]
pub struct AuditFacade {
    recorder: OperationRecorder,
}

impl AuditFacade {
    /// Creates a facade on top of an operation recorder.
    #[must_use]
    pub fn new(recorder: OperationRecorder) -> Self {
        Self { recorder }
    }

    /// Records the creation of an entity.
    pub async fn record_create(
        &self,
        actor: Actor,
        target_id: Uuid,
        entity_kind: EntityKind,
        entity: &Snapshot,
    ) -> bool {
        let details = AuditDetails::Create {
            new_entity: entity.sanitized().to_json(),
        };

        self.recorder
            .record(actor, target_id, entity_kind, OperationKind::Create, details)
            .await
    }

    /// Records an update, writing nothing when no field actually changed.
    pub async fn record_update(
        &self,
        actor: Actor,
        target_id: Uuid,
        entity_kind: EntityKind,
        original: &Snapshot,
        updated: &Snapshot,
    ) -> bool {
        let changed_fields = diff(original, updated);
        if changed_fields.is_empty() {
            debug!(entity_kind = %entity_kind, %target_id, "update changed no fields, skipping audit record");
            return true;
        }

        let details = AuditDetails::Update {
            original_name: original.display_name(),
            original_entity: Some(original.sanitized().to_json()),
            changed_fields,
        };

        self.recorder
            .record(actor, target_id, entity_kind, OperationKind::Update, details)
            .await
    }

    /// Records the deletion (or reset) of an entity.
    pub async fn record_delete(
        &self,
        actor: Actor,
        target_id: Uuid,
        entity_kind: EntityKind,
        entity: &Snapshot,
    ) -> bool {
        let details = AuditDetails::Delete {
            deleted_entity: entity.sanitized().to_json(),
        };

        self.recorder
            .record(actor, target_id, entity_kind, OperationKind::Delete, details)
            .await
    }
}

#[cfg(test)]
mod tests;
