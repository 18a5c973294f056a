//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod calendar;
mod score;
mod snapshot;
mod user;

pub use audit::{EntityKind, EntityRoot, OperationKind};
pub use calendar::{DEFAULT_UTC_OFFSET_MINUTES, DayWindow, ReportingCalendar, parse_day};
pub use score::ScoreField;
pub use snapshot::{
    FIELD_NAME_MAX_LENGTH, FieldName, FieldValue, ReservedField, Snapshot, format_value,
};
pub use user::{
    Actor, Designation, EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, UserId,
    validate_password,
};
