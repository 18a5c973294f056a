use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use appraisal_core::AppResult;
use appraisal_domain::{Actor, DayWindow, EntityKind, OperationKind, UserId};

/// Before/after text of one changed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Formatted previous value.
    pub from: String,
    /// Formatted new value.
    pub to: String,
}

/// Changed fields keyed by field name.
pub type ChangedFields = BTreeMap<String, FieldChange>;

/// Operation-shaped audit payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuditDetails {
    /// Payload of a CREATE record.
    #[serde(rename_all = "camelCase")]
    Create {
        /// Sanitized snapshot of the created entity.
        new_entity: Value,
    },
    /// Payload of an UPDATE record.
    #[serde(rename_all = "camelCase")]
    Update {
        /// Best-effort display name of the entity before the change.
        original_name: String,
        /// Sanitized snapshot of the entity before the change.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original_entity: Option<Value>,
        /// Field-level differences.
        changed_fields: ChangedFields,
    },
    /// Payload of a DELETE record.
    #[serde(rename_all = "camelCase")]
    Delete {
        /// Sanitized snapshot of the removed entity.
        deleted_entity: Value,
    },
}

impl AuditDetails {
    /// Operation kind implied by the payload shape.
    #[must_use]
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Update { .. } => OperationKind::Update,
            Self::Delete { .. } => OperationKind::Delete,
        }
    }
}

/// Immutable audit record as persisted in the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// Stable record identifier.
    pub record_id: Uuid,
    /// Who performed the change.
    pub actor: Actor,
    /// Identifier of the affected entity.
    pub target_id: Uuid,
    /// Kind of the affected entity.
    pub entity_kind: EntityKind,
    /// Kind of change.
    pub operation_kind: OperationKind,
    /// Operation-shaped payload.
    pub details: AuditDetails,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
}

/// Query filters for audit records of one reporting day.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecordFilter {
    /// Inclusive time window.
    pub window: DayWindow,
    /// Optional acting user filter.
    pub actor: Option<UserId>,
    /// Optional operation filter.
    pub operation_kind: Option<OperationKind>,
    /// Optional entity kind filter (exact match, including the item segment).
    pub entity_kind: Option<EntityKind>,
}

impl AuditRecordFilter {
    /// Returns whether `record` satisfies every filter.
    #[must_use]
    pub fn matches(&self, record: &AuditRecord) -> bool {
        self.window.contains(record.timestamp)
            && self
                .actor
                .is_none_or(|actor| record.actor.user_id() == Some(actor))
            && self
                .operation_kind
                .is_none_or(|operation_kind| record.operation_kind == operation_kind)
            && self
                .entity_kind
                .as_ref()
                .is_none_or(|entity_kind| &record.entity_kind == entity_kind)
    }
}

/// Port for persisting and querying append-only audit records.
#[async_trait]
pub trait AuditRecordRepository: Send + Sync {
    /// Persists one audit record.
    async fn append_record(&self, record: AuditRecord) -> AppResult<()>;

    /// Lists records matching `filter`, newest first.
    async fn list_records(&self, filter: AuditRecordFilter) -> AppResult<Vec<AuditRecord>>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AuditDetails, ChangedFields, FieldChange};

    #[test]
    fn update_details_serialize_with_camel_case_keys() {
        let mut changed_fields = ChangedFields::new();
        changed_fields.insert(
            "numberOfStudents".to_owned(),
            FieldChange {
                from: "40".to_owned(),
                to: "45".to_owned(),
            },
        );
        let details = AuditDetails::Update {
            original_name: "Unknown".to_owned(),
            original_entity: None,
            changed_fields,
        };

        assert_eq!(
            serde_json::to_value(&details).ok(),
            Some(json!({
                "originalName": "Unknown",
                "changedFields": {"numberOfStudents": {"from": "40", "to": "45"}}
            }))
        );
    }

    #[test]
    fn stored_payloads_deserialize_into_their_operation_shape() {
        let delete = serde_json::from_value::<AuditDetails>(json!({"deletedEntity": {"title": "X"}}));
        assert_eq!(
            delete.map(|details| details.operation_kind()).ok(),
            Some(appraisal_domain::OperationKind::Delete)
        );

        let create = serde_json::from_value::<AuditDetails>(json!({"newEntity": {}}));
        assert_eq!(
            create.map(|details| details.operation_kind()).ok(),
            Some(appraisal_domain::OperationKind::Create)
        );
    }
}
