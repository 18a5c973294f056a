//! Reporting-day aggregation of login events and audit records.
//!
//! Every query resolves its calendar day through [`ReportingCalendar`], so
//! login and operation reports share one definition of "a day".

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use appraisal_core::AppResult;
use appraisal_domain::{Designation, ReportingCalendar, UserId};

use crate::{
    AuditRecordFilter, AuditRecordRepository, LoginEvent, LoginEventFilter, LoginEventRepository,
    OperationQuery, UserDirectory,
};

/// Number of hourly slots in a reporting day.
pub const HOURS_PER_DAY: usize = 24;

/// Display name used when a user id no longer resolves to an account.
pub const UNKNOWN_USER: &str = "Unknown user";

/// Per-category totals of one reporting day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotals {
    /// Category value (designation, entity kind, ...).
    pub category: String,
    /// Number of matching records.
    pub count: u64,
    /// Sum of the metric over matching records.
    pub total: u64,
}

/// Zero-filled series of one category across the 24 local hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlySeries {
    /// Category value.
    pub category: String,
    /// Metric sum per local hour; always [`HOURS_PER_DAY`] entries.
    pub values: Vec<u64>,
}

/// Hour-by-category matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyMatrix {
    /// Slot labels `"0:00"` through `"23:00"`.
    pub labels: Vec<String>,
    /// One series per category, sorted by category ascending.
    pub series: Vec<HourlySeries>,
}

/// Shape of a login report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginBreakdown {
    /// Totals per designation.
    ByDesignation(Vec<CategoryTotals>),
    /// Hour-by-designation matrix.
    Hourly(HourlyMatrix),
}

/// Per-user login totals for a designation-filtered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLoginSummary {
    /// User identifier.
    pub user_id: UserId,
    /// Resolved display name, or [`UNKNOWN_USER`].
    pub full_name: String,
    /// Resolved email, empty when unknown.
    pub email: String,
    /// Number of login events.
    pub count: u64,
    /// Sum of `login_count`.
    pub total_logins: u64,
    /// Latest login in local time.
    pub last_login: DateTime<FixedOffset>,
}

/// Login report query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginStatisticsQuery {
    /// Optional `YYYY-MM-DD` local day; defaults to today.
    pub date: Option<String>,
    /// Optional designation filter.
    pub designation: Option<String>,
    /// Whether to return the hourly matrix instead of category totals.
    pub hourly: bool,
}

/// Login report for one local day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStatistics {
    /// Reported local day.
    pub date: NaiveDate,
    /// Sum of `login_count` over matching events.
    pub total_logins: u64,
    /// Number of matching events.
    pub total_count: u64,
    /// Requested breakdown.
    pub breakdown: LoginBreakdown,
    /// Per-user totals, present when a designation filter was supplied.
    pub users: Option<Vec<UserLoginSummary>>,
}

/// Groups `items` by category and sums `metric`, sorted by category ascending.
pub fn totals_by_category<T>(
    items: &[T],
    category: impl Fn(&T) -> String,
    metric: impl Fn(&T) -> u64,
) -> Vec<CategoryTotals> {
    let mut groups: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for item in items {
        let entry = groups.entry(category(item)).or_default();
        entry.0 += 1;
        entry.1 += metric(item);
    }

    groups
        .into_iter()
        .map(|(category, (count, total))| CategoryTotals {
            category,
            count,
            total,
        })
        .collect()
}

/// Builds a dense hour-by-category matrix in the calendar's local time.
pub fn hourly_matrix<T>(
    items: &[T],
    calendar: &ReportingCalendar,
    instant: impl Fn(&T) -> DateTime<Utc>,
    category: impl Fn(&T) -> String,
    metric: impl Fn(&T) -> u64,
) -> HourlyMatrix {
    let mut series: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    for item in items {
        let values = series
            .entry(category(item))
            .or_insert_with(|| vec![0; HOURS_PER_DAY]);
        let hour = calendar.local_hour(instant(item)) as usize;
        if let Some(slot) = values.get_mut(hour) {
            *slot += metric(item);
        }
    }

    HourlyMatrix {
        labels: (0..HOURS_PER_DAY).map(|hour| format!("{hour}:00")).collect(),
        series: series
            .into_iter()
            .map(|(category, values)| HourlySeries { category, values })
            .collect(),
    }
}

/// Aggregates login events and audit records per reporting day.
#[derive(Clone)]
pub struct TimeWindowAggregator {
    login_events: Arc<dyn LoginEventRepository>,
    audit_records: Arc<dyn AuditRecordRepository>,
    user_directory: Arc<dyn UserDirectory>,
    calendar: ReportingCalendar,
}

impl TimeWindowAggregator {
    /// Creates an aggregator over the given stores.
    #[must_use]
    pub fn new(
        login_events: Arc<dyn LoginEventRepository>,
        audit_records: Arc<dyn AuditRecordRepository>,
        user_directory: Arc<dyn UserDirectory>,
        calendar: ReportingCalendar,
    ) -> Self {
        Self {
            login_events,
            audit_records,
            user_directory,
            calendar,
        }
    }

    /// Login report for the requested day, or today when no day is given.
    pub async fn login_statistics(&self, query: LoginStatisticsQuery) -> AppResult<LoginStatistics> {
        self.login_statistics_at(query, Utc::now()).await
    }

    /// Login report with an explicit notion of "now".
    pub async fn login_statistics_at(
        &self,
        query: LoginStatisticsQuery,
        now: DateTime<Utc>,
    ) -> AppResult<LoginStatistics> {
        let window = self
            .calendar
            .window_or_today(query.date.as_deref(), now)?;
        let designation = query
            .designation
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Designation::new)
            .transpose()?;

        let events = self
            .login_events
            .list_login_events(LoginEventFilter {
                window,
                designation: designation.clone(),
            })
            .await?;

        let total_count = events.len() as u64;
        let total_logins = events
            .iter()
            .map(|event| u64::from(event.login_count))
            .sum();

        let breakdown = if query.hourly {
            LoginBreakdown::Hourly(hourly_matrix(
                &events,
                &self.calendar,
                LoginEvent::instant,
                designation_of,
                login_metric,
            ))
        } else {
            LoginBreakdown::ByDesignation(totals_by_category(&events, designation_of, login_metric))
        };

        let users = match designation {
            Some(_) => Some(self.user_summaries(&events).await?),
            None => None,
        };

        Ok(LoginStatistics {
            date: window.day(),
            total_logins,
            total_count,
            breakdown,
            users,
        })
    }

    /// Number of audit records per entity kind for a required local day,
    /// narrowed by the same filters as the operation report.
    pub async fn operation_activity(
        &self,
        query: &OperationQuery,
    ) -> AppResult<Vec<CategoryTotals>> {
        let window = self.calendar.required_window(query.date.as_deref())?;
        let records = self
            .audit_records
            .list_records(AuditRecordFilter {
                window,
                actor: query.actor,
                operation_kind: query.operation_kind,
                entity_kind: query.entity_kind.clone(),
            })
            .await?;

        Ok(totals_by_category(
            &records,
            |record| record.entity_kind.as_storage(),
            |_| 1,
        ))
    }

    async fn user_summaries(&self, events: &[LoginEvent]) -> AppResult<Vec<UserLoginSummary>> {
        let mut per_user: BTreeMap<UserId, (u64, u64, DateTime<FixedOffset>)> = BTreeMap::new();
        for event in events {
            let entry = per_user
                .entry(event.user_id)
                .or_insert((0, 0, event.date));
            entry.0 += 1;
            entry.1 += u64::from(event.login_count);
            if event.date > entry.2 {
                entry.2 = event.date;
            }
        }

        let user_ids: Vec<UserId> = per_user.keys().copied().collect();
        let profiles: HashMap<UserId, _> = self
            .user_directory
            .find_profiles(&user_ids)
            .await?
            .into_iter()
            .map(|profile| (profile.user_id, profile))
            .collect();

        let mut summaries: Vec<UserLoginSummary> = per_user
            .into_iter()
            .map(|(user_id, (count, total_logins, last_login))| {
                let (full_name, email) = profiles.get(&user_id).map_or_else(
                    || (UNKNOWN_USER.to_owned(), String::new()),
                    |profile| (profile.full_name.clone(), profile.email.clone()),
                );
                UserLoginSummary {
                    user_id,
                    full_name,
                    email,
                    count,
                    total_logins,
                    last_login,
                }
            })
            .collect();

        summaries.sort_by(|left, right| {
            right
                .total_logins
                .cmp(&left.total_logins)
                .then_with(|| left.full_name.cmp(&right.full_name))
        });

        Ok(summaries)
    }
}

fn designation_of(event: &LoginEvent) -> String {
    event.designation.as_str().to_owned()
}

fn login_metric(event: &LoginEvent) -> u64 {
    u64::from(event.login_count)
}
