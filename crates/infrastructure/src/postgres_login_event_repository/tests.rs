use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use appraisal_application::{LoginEvent, LoginEventFilter, LoginEventRepository};
use appraisal_core::ClientMetadata;
use appraisal_domain::{Designation, ReportingCalendar, UserId, parse_day};

use super::PostgresLoginEventRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres login event tests: {error}");
    }

    Some(pool)
}

#[tokio::test]
async fn login_after_local_midnight_is_listed_under_the_local_day() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let calendar = ReportingCalendar::default();
    let repository = PostgresLoginEventRepository::new(pool, calendar);
    // Unique designation keeps concurrent test data apart.
    let Ok(designation) = Designation::new(format!("Visiting Faculty {}", Uuid::new_v4())) else {
        panic!("valid designation");
    };
    let Some(instant) = Utc.with_ymd_and_hms(2032, 3, 1, 18, 35, 0).single() else {
        panic!("valid instant");
    };

    let appended = repository
        .append_login_event(LoginEvent {
            event_id: Uuid::new_v4(),
            user_id: UserId::new(),
            designation: designation.clone(),
            date: calendar.to_local(instant),
            login_count: 1,
            client: ClientMetadata::new(Some("192.168.1.4".to_owned()), None, Some("mobile".to_owned())),
        })
        .await;
    assert!(appended.is_ok());

    for (day, expected) in [("2032-03-01", 0), ("2032-03-02", 1)] {
        let Ok(day) = parse_day(day) else {
            panic!("valid test day");
        };
        let listed = repository
            .list_login_events(LoginEventFilter {
                window: calendar.day_window(day),
                designation: Some(designation.clone()),
            })
            .await;
        let Ok(listed) = listed else {
            panic!("listing should succeed");
        };
        assert_eq!(listed.len(), expected);
        if let Some(event) = listed.first() {
            assert_eq!(event.instant(), instant);
            assert_eq!(event.date.offset(), &calendar.offset());
            assert_eq!(event.client.device(), Some("mobile"));
        }
    }
}

#[tokio::test]
async fn login_in_the_final_millisecond_stays_in_its_local_day() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let calendar = ReportingCalendar::default();
    let repository = PostgresLoginEventRepository::new(pool, calendar);
    let Ok(designation) = Designation::new(format!("Adjunct Faculty {}", Uuid::new_v4())) else {
        panic!("valid designation");
    };
    let Some(instant) = Utc
        .with_ymd_and_hms(2032, 3, 2, 18, 29, 59)
        .single()
        .map(|instant| instant + chrono::Duration::microseconds(999_500))
    else {
        panic!("valid instant");
    };

    let appended = repository
        .append_login_event(LoginEvent {
            event_id: Uuid::new_v4(),
            user_id: UserId::new(),
            designation: designation.clone(),
            date: calendar.to_local(instant),
            login_count: 1,
            client: ClientMetadata::new(None, None, None),
        })
        .await;
    assert!(appended.is_ok());

    for (day, expected) in [("2032-03-02", 1), ("2032-03-03", 0)] {
        let Ok(day) = parse_day(day) else {
            panic!("valid test day");
        };
        let listed = repository
            .list_login_events(LoginEventFilter {
                window: calendar.day_window(day),
                designation: Some(designation.clone()),
            })
            .await;
        assert_eq!(listed.map(|events| events.len()).ok(), Some(expected));
    }
}
