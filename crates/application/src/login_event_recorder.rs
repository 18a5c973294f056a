use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, error};
use uuid::Uuid;

use appraisal_core::{AppResult, ClientMetadata};
use appraisal_domain::{DayWindow, Designation, ReportingCalendar, UserId};

/// One successful login, never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginEvent {
    /// Stable event identifier.
    pub event_id: Uuid,
    /// User who logged in.
    pub user_id: UserId,
    /// Designation of the user at login time.
    pub designation: Designation,
    /// Login instant expressed in the reporting offset.
    pub date: DateTime<FixedOffset>,
    /// Metric summed by login reports.
    pub login_count: u32,
    /// Caller details.
    pub client: ClientMetadata,
}

impl LoginEvent {
    /// Login instant in UTC.
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        self.date.with_timezone(&Utc)
    }
}

/// Query filters for login events of one reporting day.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginEventFilter {
    /// Inclusive time window.
    pub window: DayWindow,
    /// Optional designation filter.
    pub designation: Option<Designation>,
}

impl LoginEventFilter {
    /// Returns whether `event` satisfies every filter.
    #[must_use]
    pub fn matches(&self, event: &LoginEvent) -> bool {
        self.window.contains(event.instant())
            && self
                .designation
                .as_ref()
                .is_none_or(|designation| &event.designation == designation)
    }
}

/// Port for append-only login event persistence.
#[async_trait]
pub trait LoginEventRepository: Send + Sync {
    /// Persists one login event.
    async fn append_login_event(&self, event: LoginEvent) -> AppResult<()>;

    /// Lists login events matching `filter`, oldest first.
    async fn list_login_events(&self, filter: LoginEventFilter) -> AppResult<Vec<LoginEvent>>;
}

/// Appends one login event per successful credential check.
#[derive(Clone)]
pub struct LoginEventRecorder {
    repository: Arc<dyn LoginEventRepository>,
    calendar: ReportingCalendar,
}

impl LoginEventRecorder {
    /// Creates a recorder that normalizes login instants to `calendar`'s offset.
    #[must_use]
    pub fn new(repository: Arc<dyn LoginEventRepository>, calendar: ReportingCalendar) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    /// Records a login that happened now. Store failures are logged, not returned.
    pub async fn record_login(
        &self,
        user_id: UserId,
        designation: Designation,
        client: ClientMetadata,
    ) {
        self.record_login_at(user_id, designation, client, Utc::now())
            .await;
    }

    /// Records a login that happened at `instant`.
    pub async fn record_login_at(
        &self,
        user_id: UserId,
        designation: Designation,
        client: ClientMetadata,
        instant: DateTime<Utc>,
    ) {
        let event = LoginEvent {
            event_id: Uuid::new_v4(),
            user_id,
            designation,
            date: self.calendar.to_local(instant),
            login_count: 1,
            client,
        };
        let date = event.date;

        match self.repository.append_login_event(event).await {
            Ok(()) => debug!(%user_id, %date, "login event recorded"),
            Err(err) => error!(%user_id, error = %err, "failed to record login event"),
        }
    }
}
