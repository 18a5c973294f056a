//! Field-level captures of business entities used by the audit trail.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use appraisal_core::{AppError, AppResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

/// Maximum accepted length of a snapshot field name.
pub const FIELD_NAME_MAX_LENGTH: usize = 128;

/// Fields with a fixed meaning across every audited document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedField {
    /// Reference to the owning/acting user.
    ActorReference,
    /// Password hash or plaintext.
    Password,
    /// Primary key of the document.
    PrimaryKey,
    /// Internal document revision counter.
    Revision,
}

impl ReservedField {
    /// Returns the field name used in stored documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActorReference => "userId",
            Self::Password => "password",
            Self::PrimaryKey => "id",
            Self::Revision => "revision",
        }
    }

    /// Fields never reported as changed by the differ.
    #[must_use]
    pub fn diff_skipped() -> &'static [Self] {
        &[
            Self::ActorReference,
            Self::Password,
            Self::PrimaryKey,
            Self::Revision,
        ]
    }

    /// Fields stripped from any snapshot before it is persisted in an audit payload.
    #[must_use]
    pub fn sanitized() -> &'static [Self] {
        &[Self::Password, Self::Revision]
    }
}

/// Validated snapshot field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldName(String);

impl FieldName {
    /// Validates a document field name.
    ///
    /// Names must be non-empty, bounded, free of control characters, and may
    /// not start with `$` or contain `.` (both are reserved by document stores).
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.is_empty() {
            return Err(AppError::Validation(
                "field name must not be empty".to_owned(),
            ));
        }
        if value.chars().count() > FIELD_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "field name must not exceed {FIELD_NAME_MAX_LENGTH} characters"
            )));
        }
        if value.starts_with('$')
            || value.contains('.')
            || value.chars().any(char::is_control)
        {
            return Err(AppError::Validation(format!(
                "field name '{}' contains reserved characters",
                value.escape_default()
            )));
        }

        Ok(Self(value))
    }

    /// Returns the field name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this name is the given reserved field.
    #[must_use]
    pub fn is(&self, reserved: ReservedField) -> bool {
        self.0 == reserved.as_str()
    }
}

impl From<ReservedField> for FieldName {
    fn from(value: ReservedField) -> Self {
        Self(value.as_str().to_owned())
    }
}

impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One field value inside a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Text value.
    Text(String),
    /// Point in time.
    Instant(DateTime<Utc>),
    /// Ordered list.
    List(Vec<Value>),
    /// Nested object.
    Object(Map<String, Value>),
}

impl FieldValue {
    /// Returns the canonical text used in change reports.
    ///
    /// Lists and objects use their compact JSON form, instants use RFC 3339
    /// with millisecond precision in UTC.
    #[must_use]
    pub fn format(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Bool(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value.clone(),
            Self::Instant(value) => format_instant(value),
            Self::List(values) => serde_json::to_string(values)
                .unwrap_or_else(|_| "[unserializable list]".to_owned()),
            Self::Object(values) => serde_json::to_string(values)
                .unwrap_or_else(|_| "[unserializable object]".to_owned()),
        }
    }

    /// Compares two values the way the change differ does.
    ///
    /// Lists and objects compare structurally (lists are order-sensitive);
    /// everything else compares by value, with numbers compared numerically
    /// and instants matching text that encodes the same instant.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(left), Self::List(right)) => left == right,
            (Self::Object(left), Self::Object(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => numbers_equal(left, right),
            (Self::Instant(instant), Self::Text(text)) | (Self::Text(text), Self::Instant(instant)) => {
                DateTime::parse_from_rfc3339(text)
                    .is_ok_and(|parsed| parsed.with_timezone(&Utc) == *instant)
            }
            (left, right) => left == right,
        }
    }

    /// Converts the value into its persisted JSON form.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(value) => Value::Bool(*value),
            Self::Number(value) => Value::Number(value.clone()),
            Self::Text(value) => Value::String(value.clone()),
            Self::Instant(value) => Value::String(format_instant(value)),
            Self::List(values) => Value::Array(values.clone()),
            Self::Object(values) => Value::Object(values.clone()),
        }
    }
}

/// Formats an optional value, rendering absence as `"null"`.
#[must_use]
pub fn format_value(value: Option<&FieldValue>) -> String {
    value.map_or_else(|| FieldValue::Null.format(), FieldValue::format)
}

fn format_instant(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let (Some(left), Some(right)) = (left.as_i64(), right.as_i64()) {
        return left == right;
    }
    if let (Some(left), Some(right)) = (left.as_u64(), right.as_u64()) {
        return left == right;
    }

    match (left.as_f64(), right.as_f64()) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            Value::Number(value) => Self::Number(value),
            Value::String(value) => Self::Text(value),
            Value::Array(values) => Self::List(values),
            Value::Object(values) => Self::Object(values),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Full field-value capture of an entity at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    fields: BTreeMap<FieldName, FieldValue>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from a JSON object, validating every field name.
    pub fn from_json(value: Value) -> AppResult<Self> {
        let Value::Object(object) = value else {
            return Err(AppError::Validation(
                "entity snapshot must be a JSON object".to_owned(),
            ));
        };

        let mut fields = BTreeMap::new();
        for (name, value) in object {
            fields.insert(FieldName::new(name)?, FieldValue::from(value));
        }

        Ok(Self { fields })
    }

    /// Adds a field, replacing any previous value.
    ///
    /// Names that fail [`FieldName`] validation are rejected.
    pub fn insert(&mut self, name: &str, value: impl Into<FieldValue>) -> AppResult<()> {
        self.fields.insert(FieldName::new(name)?, value.into());
        Ok(())
    }

    /// Builder-style variant of [`Snapshot::insert`].
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> AppResult<Self> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Returns the value stored for `name`.
    #[must_use]
    pub fn get(&self, name: &FieldName) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns the value stored for a raw field name.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns whether the snapshot contains `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get_str(name).is_some()
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &FieldValue)> {
        self.fields.iter()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the snapshot has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a copy without password and revision fields.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let fields = self
            .fields
            .iter()
            .filter(|(name, _)| {
                !ReservedField::sanitized()
                    .iter()
                    .any(|reserved| name.is(*reserved))
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Self { fields }
    }

    /// Best-effort human label: `fullName`, then `title`, then `Unknown`.
    #[must_use]
    pub fn display_name(&self) -> String {
        ["fullName", "title"]
            .iter()
            .find_map(|name| match self.get_str(name) {
                Some(FieldValue::Text(value)) if !value.trim().is_empty() => Some(value.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "Unknown".to_owned())
    }

    /// Converts the snapshot into a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, value)| (name.as_str().to_owned(), value.to_json()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use serde_json::json;

    use super::{FieldName, FieldValue, Snapshot, format_value};

    #[test]
    fn null_and_absent_values_format_as_null() {
        assert_eq!(FieldValue::Null.format(), "null");
        assert_eq!(format_value(None), "null");
    }

    #[test]
    fn lists_format_as_compact_json() {
        assert_eq!(FieldValue::from(json!([1, 2, 3])).format(), "[1,2,3]");
        assert_eq!(
            FieldValue::from(json!({"level": "National"})).format(),
            r#"{"level":"National"}"#
        );
    }

    #[test]
    fn instants_format_as_rfc3339_millis() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 18, 35, 0).single();
        let formatted = instant.map(|instant| FieldValue::Instant(instant).format());
        assert_eq!(formatted.as_deref(), Some("2024-03-01T18:35:00.000Z"));
    }

    #[test]
    fn numbers_compare_numerically() {
        assert!(FieldValue::from(json!(40)).same_as(&FieldValue::from(json!(40.0))));
        assert!(!FieldValue::from(json!(40)).same_as(&FieldValue::from(json!(45))));
        assert!(!FieldValue::from(json!(40)).same_as(&FieldValue::from(json!("40"))));
    }

    #[test]
    fn instant_matches_text_for_the_same_moment() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 18, 35, 0).single();
        let Some(instant) = instant else {
            panic!("valid test instant");
        };
        let value = FieldValue::Instant(instant);
        assert!(value.same_as(&FieldValue::from("2024-03-02T00:05:00+05:30")));
        assert!(!value.same_as(&FieldValue::from("2024-03-01")));
    }

    #[test]
    fn non_object_snapshot_is_rejected() {
        assert!(Snapshot::from_json(json!([1, 2])).is_err());
        assert!(Snapshot::from_json(json!("text")).is_err());
    }

    #[test]
    fn reserved_characters_in_field_names_are_rejected() {
        assert!(FieldName::new("").is_err());
        assert!(FieldName::new("$where").is_err());
        assert!(FieldName::new("a.b").is_err());
        assert!(Snapshot::from_json(json!({"$set": 1})).is_err());
    }

    #[test]
    fn sanitized_snapshot_drops_password_and_revision() {
        let snapshot = Snapshot::from_json(json!({
            "title": "X",
            "password": "secret",
            "revision": 3,
            "id": "abc"
        }));
        let sanitized = snapshot.map(|snapshot| snapshot.sanitized().to_json());
        assert_eq!(sanitized.ok(), Some(json!({"title": "X", "id": "abc"})));
    }

    #[test]
    fn display_name_prefers_full_name_then_title() {
        let named = Snapshot::from_json(json!({"fullName": "Dr. Rao", "title": "Paper"}));
        assert_eq!(named.map(|s| s.display_name()).ok().as_deref(), Some("Dr. Rao"));

        let titled = Snapshot::from_json(json!({"title": "Paper"}));
        assert_eq!(titled.map(|s| s.display_name()).ok().as_deref(), Some("Paper"));

        assert_eq!(Snapshot::new().display_name(), "Unknown");
    }

    proptest! {
        #[test]
        fn json_objects_roundtrip_through_snapshots(
            entries in proptest::collection::btree_map("[a-zA-Z][a-zA-Z0-9_]{0,12}", any::<i64>(), 0..8)
        ) {
            let object = serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), json!(value)))
                    .collect(),
            );
            let snapshot = Snapshot::from_json(object.clone());
            prop_assert!(snapshot.is_ok());
            prop_assert_eq!(snapshot.map(|s| s.to_json()).ok(), Some(object));
        }
    }
}
