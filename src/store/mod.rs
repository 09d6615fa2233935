// SPDX-License-Identifier: MIT
//
// Data layer — the document database as the screens see it.
//
// Screens never talk to a database directly. They go through the
// `DocumentStore` trait: connect, list, count, find, insert, update and
// delete, with documents as JSON objects. The binary ships one
// implementation, `MemoryStore`, which keeps everything in process and
// can persist to a JSON file.
//
// Documents are `serde_json` maps with insertion order preserved, so a
// document is shown and edited with its keys in the order it was written.

mod memory;
mod oid;
mod query;

pub use memory::MemoryStore;

use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

/// One document: a JSON object.
pub type Document = Map<String, Value>;

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Why a data-layer operation failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not connected")]
    NotConnected,
    #[error("connection URI is empty")]
    EmptyUri,
    #[error("unsupported URI '{0}' (expected mem://[db], file://<path> or a .json path)")]
    UnsupportedUri(String),
    #[error("database '{0}' does not exist")]
    UnknownDatabase(String),
    #[error("collection '{0}' does not exist")]
    UnknownCollection(String),
    #[error("collection '{0}' already exists")]
    CollectionExists(String),
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("{0}")]
    InvalidJson(String),
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("invalid update: {0}")]
    InvalidUpdate(String),
    #[error("{}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ─── DocumentStore ──────────────────────────────────────────────────────────

/// A document database: databases hold named collections of documents.
///
/// Every operation except `connect`, `disconnect` and `is_connected`
/// fails with [`StoreError::NotConnected`] before a successful `connect`.
pub trait DocumentStore {
    /// Open the store named by `uri`.
    fn connect(&mut self, uri: &str) -> Result<(), StoreError>;

    /// Close the store. Idempotent.
    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    /// Database names, sorted.
    fn list_databases(&self) -> Result<Vec<String>, StoreError>;

    /// Collection names in `db`, sorted.
    fn list_collections(&self, db: &str) -> Result<Vec<String>, StoreError>;

    /// Create an empty collection, creating `db` if needed.
    fn create_collection(&mut self, db: &str, name: &str) -> Result<(), StoreError>;

    /// Drop a collection and all its documents.
    fn drop_collection(&mut self, db: &str, name: &str) -> Result<(), StoreError>;

    /// Number of documents in `db.coll` matching `filter`.
    fn count(&self, db: &str, coll: &str, filter: &Document) -> Result<u64, StoreError>;

    /// Matching documents in insertion order, after skipping `skip`, at
    /// most `limit` of them.
    fn find(
        &self,
        db: &str,
        coll: &str,
        filter: &Document,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert a document, assigning an `_id` if it has none. Returns the
    /// `_id`. The collection is created on first insert.
    fn insert(&mut self, db: &str, coll: &str, doc: Document) -> Result<Value, StoreError>;

    /// Apply `$set` / `$unset` operators to the first match, or every
    /// match with `many`. Returns how many documents changed.
    fn update(
        &mut self,
        db: &str,
        coll: &str,
        filter: &Document,
        update: &Document,
        many: bool,
    ) -> Result<u64, StoreError>;

    /// Delete the first match, or every match with `many`. Returns how
    /// many documents were deleted.
    fn delete(
        &mut self,
        db: &str,
        coll: &str,
        filter: &Document,
        many: bool,
    ) -> Result<u64, StoreError>;
}

// ─── JSON conversion ────────────────────────────────────────────────────────

/// Compact single-line JSON for a document.
#[must_use]
pub fn document_to_json(doc: &Document) -> String {
    Value::Object(doc.clone()).to_string()
}

/// Parse `text` as a document.
///
/// # Errors
///
/// [`StoreError::InvalidJson`] with the parser's message, or
/// [`StoreError::NotAnObject`] if the JSON is valid but not an object.
pub fn json_to_document(text: &str) -> Result<Document, StoreError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::NotAnObject),
        Err(e) => Err(StoreError::InvalidJson(e.to_string())),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn document_round_trip_keeps_key_order() {
        let doc = json_to_document(r#"{"z":1,"a":{"b":[true,null]},"m":"x"}"#).unwrap();
        assert_eq!(document_to_json(&doc), r#"{"z":1,"a":{"b":[true,null]},"m":"x"}"#);
    }

    #[test]
    fn pretty_editor_text_parses() {
        let doc = json_to_document("{\n  \"a\":1,\n  \"b\":2\n}").unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn invalid_json_reports_parser_message() {
        let err = json_to_document("{\"a\":}").unwrap_err();
        assert!(matches!(err, StoreError::InvalidJson(_)));
        assert!(err.to_string().contains("line 1"), "{err}");
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(json_to_document("[1,2]"), Err(StoreError::NotAnObject)));
        assert!(matches!(json_to_document("3"), Err(StoreError::NotAnObject)));
    }

    #[test]
    fn insert_template_is_an_empty_object() {
        assert!(json_to_document("{\n  \n}").unwrap().is_empty());
        assert!(json_to_document("").is_err());
    }

    #[test]
    fn error_messages() {
        assert_eq!(StoreError::NotConnected.to_string(), "not connected");
        assert_eq!(
            StoreError::InvalidName {
                name: "a$b".to_string(),
                reason: "must not contain '$'"
            }
            .to_string(),
            "invalid name 'a$b': must not contain '$'"
        );
    }
}
