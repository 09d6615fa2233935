// SPDX-License-Identifier: MIT
//
// Filters and update operators.
//
// A filter matches a document when every top-level filter key is present
// in the document with an equal value; `{}` matches everything. Values
// compare structurally, so `{"_id": {"$oid": "..."}}` finds a document by
// its object id.
//
// Updates are operator documents. `$set` writes keys, `$unset` removes
// them. `_id` can be neither changed nor removed.

use serde_json::Value;

use super::{Document, StoreError};

/// Whether `doc` satisfies `filter`.
#[must_use]
pub fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, want)| doc.get(key) == Some(want))
}

/// Check an update document without applying it.
fn validate_update(update: &Document) -> Result<(), StoreError> {
    if update.is_empty() {
        return Err(StoreError::InvalidUpdate("no operators".to_string()));
    }
    for (op, arg) in update {
        if op != "$set" && op != "$unset" {
            return Err(StoreError::InvalidUpdate(format!("unsupported operator '{op}'")));
        }
        if !arg.is_object() {
            return Err(StoreError::InvalidUpdate(format!("{op} needs an object")));
        }
    }
    Ok(())
}

/// Apply `update` to `doc`. Returns whether anything changed.
///
/// # Errors
///
/// [`StoreError::InvalidUpdate`] for unknown operators, non-object
/// operands, or an attempt to change or remove `_id`. `doc` is untouched
/// on error.
pub fn apply_update(doc: &mut Document, update: &Document) -> Result<bool, StoreError> {
    validate_update(update)?;

    let sets = update.get("$set").and_then(Value::as_object);
    let unsets = update.get("$unset").and_then(Value::as_object);

    let id_changed = sets
        .and_then(|s| s.get("_id"))
        .zip(doc.get("_id"))
        .is_some_and(|(new, old)| new != old);
    if id_changed {
        return Err(StoreError::InvalidUpdate("_id is immutable".to_string()));
    }
    if unsets.is_some_and(|u| u.contains_key("_id")) {
        return Err(StoreError::InvalidUpdate("_id cannot be removed".to_string()));
    }

    let mut changed = false;
    for (key, value) in sets.into_iter().flatten() {
        if doc.get(key) != Some(value) {
            doc.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    for key in unsets.into_iter().flat_map(|u| u.keys()) {
        changed |= doc.shift_remove(key).is_some();
    }
    Ok(changed)
}
