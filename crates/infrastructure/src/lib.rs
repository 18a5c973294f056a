//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_document_store;
mod postgres_audit_record_repository;
mod postgres_login_event_repository;
mod postgres_store_health;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_document_store::InMemoryDocumentStore;
pub use postgres_audit_record_repository::PostgresAuditRecordRepository;
pub use postgres_login_event_repository::PostgresLoginEventRepository;
pub use postgres_store_health::PostgresStoreHealth;
pub use postgres_user_repository::PostgresUserRepository;
