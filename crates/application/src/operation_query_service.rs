//! Day-scoped audit record reports grouped by entity kind.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;

use appraisal_core::AppResult;
use appraisal_domain::{Actor, EntityKind, OperationKind, ReportingCalendar, UserId};

use crate::time_window_aggregator::UNKNOWN_USER;
use crate::{AuditRecord, AuditRecordFilter, AuditRecordRepository, UserDirectory, UserProfile};

/// Display name of records written without an authenticated actor.
pub const SYSTEM_ACTOR_NAME: &str = "System";

/// Filters for an operation report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationQuery {
    /// Required `YYYY-MM-DD` local day.
    pub date: Option<String>,
    /// Only records written by this user.
    pub actor: Option<UserId>,
    /// Only records of this operation.
    pub operation_kind: Option<OperationKind>,
    /// Only records of this entity kind.
    pub entity_kind: Option<EntityKind>,
}

/// Resolved display form of an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorSummary {
    /// Actor identifier; `None` for the system actor.
    pub id: Option<UserId>,
    /// Display name.
    pub full_name: String,
    /// Email, when known.
    pub email: Option<String>,
    /// Designation, when known.
    pub designation: Option<String>,
    /// Department, when known.
    pub department: Option<String>,
}

impl ActorSummary {
    fn system() -> Self {
        Self {
            id: None,
            full_name: SYSTEM_ACTOR_NAME.to_owned(),
            email: None,
            designation: None,
            department: None,
        }
    }

    fn unknown(user_id: UserId) -> Self {
        Self {
            id: Some(user_id),
            full_name: UNKNOWN_USER.to_owned(),
            email: None,
            designation: None,
            department: None,
        }
    }
}

impl From<&UserProfile> for ActorSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: Some(profile.user_id),
            full_name: profile.full_name.clone(),
            email: Some(profile.email.clone()),
            designation: Some(profile.designation.clone()),
            department: profile.department.clone(),
        }
    }
}

/// Audit record paired with its resolved actor.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationView {
    /// Stored record.
    pub record: AuditRecord,
    /// Display form of the record's actor.
    pub actor: ActorSummary,
}

/// Audit records of one local day grouped by entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationReport {
    /// Reported local day.
    pub date: NaiveDate,
    /// Records per entity kind, newest first within each group.
    pub operations: BTreeMap<String, Vec<OperationView>>,
}

/// Reads audit records for reporting.
#[derive(Clone)]
pub struct OperationQueryService {
    repository: Arc<dyn AuditRecordRepository>,
    user_directory: Arc<dyn UserDirectory>,
    calendar: ReportingCalendar,
}

impl OperationQueryService {
    /// Creates a query service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AuditRecordRepository>,
        user_directory: Arc<dyn UserDirectory>,
        calendar: ReportingCalendar,
    ) -> Self {
        Self {
            repository,
            user_directory,
            calendar,
        }
    }

    /// Returns the day's records grouped by entity kind.
    ///
    /// The day is mandatory; there is no implicit "today".
    pub async fn operations_by_day(&self, query: OperationQuery) -> AppResult<OperationReport> {
        let window = self.calendar.required_window(query.date.as_deref())?;
        let mut records = self
            .repository
            .list_records(AuditRecordFilter {
                window,
                actor: query.actor,
                operation_kind: query.operation_kind,
                entity_kind: query.entity_kind,
            })
            .await?;
        records.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));

        let actors = self.resolve_actors(&records).await?;

        let mut operations: BTreeMap<String, Vec<OperationView>> = BTreeMap::new();
        for record in records {
            let actor = match record.actor {
                Actor::System => ActorSummary::system(),
                Actor::User(user_id) => actors
                    .get(&user_id)
                    .map_or_else(|| ActorSummary::unknown(user_id), ActorSummary::from),
            };
            operations
                .entry(record.entity_kind.as_storage())
                .or_default()
                .push(OperationView { record, actor });
        }

        Ok(OperationReport {
            date: window.day(),
            operations,
        })
    }

    async fn resolve_actors(
        &self,
        records: &[AuditRecord],
    ) -> AppResult<HashMap<UserId, UserProfile>> {
        let mut user_ids: Vec<UserId> = records
            .iter()
            .filter_map(|record| record.actor.user_id())
            .collect();
        user_ids.sort();
        user_ids.dedup();

        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(self
            .user_directory
            .find_profiles(&user_ids)
            .await?
            .into_iter()
            .map(|profile| (profile.user_id, profile))
            .collect())
    }
}

#[cfg(test)]
mod tests;
