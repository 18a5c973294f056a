use std::sync::Arc;

use appraisal_application::{
    AuditFacade, AuditRecordRepository, FacultyScoreService, LoginEventRecorder,
    LoginEventRepository, OperationQueryService, OperationRecorder, PasswordHasher, StoreHealth,
    TimeWindowAggregator, UserDirectory, UserRepository, UserService,
};
use appraisal_core::AppError;
use appraisal_domain::ReportingCalendar;
use appraisal_infrastructure::{
    Argon2PasswordHasher, InMemoryDocumentStore, PostgresAuditRecordRepository,
    PostgresLoginEventRepository, PostgresStoreHealth, PostgresUserRepository,
};
use sqlx::PgPool;

use crate::api_config::{ApiConfig, StoreConfig};
use crate::state::AppState;

use super::database::connect_and_migrate;

struct DocumentStores {
    name: &'static str,
    users: Arc<dyn UserRepository>,
    user_directory: Arc<dyn UserDirectory>,
    audit_records: Arc<dyn AuditRecordRepository>,
    login_events: Arc<dyn LoginEventRepository>,
    health: Arc<dyn StoreHealth>,
}

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let stores = match &config.store {
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = connect_and_migrate(database_url, *max_connections).await?;
            postgres_stores(pool, config.calendar)
        }
        StoreConfig::Memory => {
            tracing::warn!("using the in-memory document store; data is lost on restart");
            memory_stores(Arc::new(InMemoryDocumentStore::new()))
        }
    };

    Ok(assemble(
        stores,
        Arc::new(Argon2PasswordHasher::new()),
        config.calendar,
    ))
}

#[cfg(test)]
pub(crate) fn build_in_memory_state(
    store: Arc<InMemoryDocumentStore>,
    calendar: ReportingCalendar,
) -> AppState {
    assemble(
        memory_stores(store),
        Arc::new(Argon2PasswordHasher::new()),
        calendar,
    )
}

fn postgres_stores(pool: PgPool, calendar: ReportingCalendar) -> DocumentStores {
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));

    DocumentStores {
        name: "postgres",
        users: users.clone(),
        user_directory: users,
        audit_records: Arc::new(PostgresAuditRecordRepository::new(pool.clone())),
        login_events: Arc::new(PostgresLoginEventRepository::new(pool.clone(), calendar)),
        health: Arc::new(PostgresStoreHealth::new(pool)),
    }
}

fn memory_stores(store: Arc<InMemoryDocumentStore>) -> DocumentStores {
    DocumentStores {
        name: "memory",
        users: store.clone(),
        user_directory: store.clone(),
        audit_records: store.clone(),
        login_events: store.clone(),
        health: store,
    }
}

fn assemble(
    stores: DocumentStores,
    password_hasher: Arc<dyn PasswordHasher>,
    calendar: ReportingCalendar,
) -> AppState {
    let audit = AuditFacade::new(OperationRecorder::new(stores.audit_records.clone()));
    let login_event_recorder = LoginEventRecorder::new(stores.login_events.clone(), calendar);

    AppState {
        user_service: UserService::new(
            stores.users.clone(),
            password_hasher,
            login_event_recorder,
            audit.clone(),
        ),
        faculty_score_service: FacultyScoreService::new(stores.users, audit),
        time_window_aggregator: TimeWindowAggregator::new(
            stores.login_events,
            stores.audit_records.clone(),
            stores.user_directory.clone(),
            calendar,
        ),
        operation_query_service: OperationQueryService::new(
            stores.audit_records,
            stores.user_directory,
            calendar,
        ),
        store_health: stores.health,
        store_name: stores.name,
    }
}
