use std::sync::Arc;

use appraisal_application::CreateUserInput;
use appraisal_domain::{Actor, ReportingCalendar, UserId};
use appraisal_infrastructure::InMemoryDocumentStore;

use crate::api_services::build_in_memory_state;
use crate::state::AppState;

pub(crate) const TEST_PASSWORD: &str = "correct-horse-42";

pub(crate) fn memory_state() -> (AppState, Arc<InMemoryDocumentStore>) {
    let store = Arc::new(InMemoryDocumentStore::new());
    (
        build_in_memory_state(store.clone(), ReportingCalendar::default()),
        store,
    )
}

pub(crate) async fn seed_user(state: &AppState, full_name: &str, email: &str) -> UserId {
    let Ok(user) = state
        .user_service
        .create_user(
            Actor::System,
            CreateUserInput {
                full_name: full_name.to_owned(),
                email: email.to_owned(),
                designation: "Associate Professor".to_owned(),
                department: Some("CSE".to_owned()),
                password: TEST_PASSWORD.to_owned(),
            },
        )
        .await
    else {
        panic!("seed user should be created");
    };
    user.id
}

pub(crate) fn today() -> String {
    ReportingCalendar::default()
        .local_day(chrono::Utc::now())
        .to_string()
}
