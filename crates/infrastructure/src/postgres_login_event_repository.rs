use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use appraisal_application::{LoginEvent, LoginEventFilter, LoginEventRepository};
use appraisal_core::{AppError, AppResult, ClientMetadata};
use appraisal_domain::{Designation, ReportingCalendar, UserId};

/// PostgreSQL-backed store of login events.
///
/// Instants are stored as `timestamptz` and re-expressed in the reporting
/// offset when read back.
#[derive(Clone)]
pub struct PostgresLoginEventRepository {
    pool: PgPool,
    calendar: ReportingCalendar,
}

impl PostgresLoginEventRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool, calendar: ReportingCalendar) -> Self {
        Self { pool, calendar }
    }
}

#[derive(Debug, FromRow)]
struct LoginEventRow {
    id: Uuid,
    user_id: Uuid,
    designation: String,
    date: DateTime<Utc>,
    login_count: i32,
    ip_address: Option<String>,
    user_agent: Option<String>,
    device: Option<String>,
}

impl LoginEventRow {
    fn into_event(self, calendar: &ReportingCalendar) -> AppResult<LoginEvent> {
        let login_count = u32::try_from(self.login_count).map_err(|error| {
            AppError::Internal(format!(
                "login event '{}' has invalid login count: {error}",
                self.id
            ))
        })?;

        Ok(LoginEvent {
            event_id: self.id,
            user_id: UserId::from_uuid(self.user_id),
            designation: Designation::new(self.designation)?,
            date: calendar.to_local(self.date),
            login_count,
            client: ClientMetadata::new(self.ip_address, self.user_agent, self.device),
        })
    }
}

#[async_trait]
impl LoginEventRepository for PostgresLoginEventRepository {
    async fn append_login_event(&self, event: LoginEvent) -> AppResult<()> {
        let login_count = i32::try_from(event.login_count).map_err(|error| {
            AppError::Validation(format!("login count is out of range: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO login_events (
                id,
                user_id,
                designation,
                date,
                login_count,
                ip_address,
                user_agent,
                device
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(event.event_id)
        .bind(event.user_id.as_uuid())
        .bind(event.designation.as_str())
        .bind(event.instant())
        .bind(login_count)
        .bind(event.client.ip_address())
        .bind(event.client.user_agent())
        .bind(event.client.device())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append login event: {error}")))?;

        Ok(())
    }

    async fn list_login_events(&self, filter: LoginEventFilter) -> AppResult<Vec<LoginEvent>> {
        let rows = sqlx::query_as::<_, LoginEventRow>(
            r#"
            SELECT
                id,
                user_id,
                designation,
                date,
                login_count,
                ip_address,
                user_agent,
                device
            FROM login_events
            WHERE date >= $1
                AND date < $2
                AND ($3::TEXT IS NULL OR designation = $3)
            ORDER BY date ASC, id
            "#,
        )
        .bind(filter.window.start())
        .bind(filter.window.end())
        .bind(filter.designation.as_ref().map(Designation::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list login events: {error}")))?;

        rows.into_iter()
            .map(|row| row.into_event(&self.calendar))
            .collect()
    }
}

#[cfg(test)]
mod tests;
