//! Field-level diff between two entity snapshots.
//!
//! Only keys present in the updated snapshot are inspected: a field that
//! exists in the original but is missing from the update is not reported as
//! a change. Identity and internal fields are never reported.

use appraisal_domain::{FieldValue, ReservedField, Snapshot, format_value};

use crate::{ChangedFields, FieldChange};

/// Computes changed fields between `original` and `updated`.
#[must_use]
pub fn diff(original: &Snapshot, updated: &Snapshot) -> ChangedFields {
    updated
        .iter()
        .filter(|(name, _)| {
            !ReservedField::diff_skipped()
                .iter()
                .any(|reserved| name.is(*reserved))
        })
        .filter_map(|(name, new_value)| {
            let old_value = original.get(name);
            if values_match(old_value, new_value) {
                return None;
            }

            Some((
                name.as_str().to_owned(),
                FieldChange {
                    from: format_value(old_value),
                    to: new_value.format(),
                },
            ))
        })
        .collect()
}

fn values_match(old_value: Option<&FieldValue>, new_value: &FieldValue) -> bool {
    match old_value {
        Some(old_value) => old_value.same_as(new_value),
        // A field missing from the original reads as null.
        None => matches!(new_value, FieldValue::Null),
    }
}
