//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_facade;
mod audit_ports;
mod change_differ;
mod faculty_score_service;
mod login_event_recorder;
mod operation_query_service;
mod operation_recorder;
mod store_health;
mod time_window_aggregator;
mod user_service;

pub use audit_facade::AuditFacade;
pub use audit_ports::{
    AuditDetails, AuditRecord, AuditRecordFilter, AuditRecordRepository, ChangedFields,
    FieldChange,
};
pub use change_differ::diff;
pub use faculty_score_service::{FacultyScoreService, ScoreChange};
pub use login_event_recorder::{
    LoginEvent, LoginEventFilter, LoginEventRecorder, LoginEventRepository,
};
pub use operation_query_service::{
    ActorSummary, OperationQuery, OperationQueryService, OperationReport, OperationView,
    SYSTEM_ACTOR_NAME,
};
pub use operation_recorder::OperationRecorder;
pub use store_health::StoreHealth;
pub use time_window_aggregator::{
    CategoryTotals, HOURS_PER_DAY, HourlyMatrix, HourlySeries, LoginBreakdown, LoginStatistics,
    LoginStatisticsQuery, TimeWindowAggregator, UNKNOWN_USER, UserLoginSummary, hourly_matrix,
    totals_by_category,
};
pub use user_service::{
    AuthenticatedUser, CreateUserInput, PasswordHasher, UpdateUserInput, UserDirectory,
    UserProfile, UserRecord, UserRepository, UserService,
};
