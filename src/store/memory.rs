// SPDX-License-Identifier: MIT
//
// MemoryStore — an in-process document store.
//
// Databases and collections live in sorted maps; a collection is a vector
// of documents in insertion order. With a `file://` URI (or a bare `.json`
// path) the whole store is loaded on connect and written back after every
// mutation, shaped `{db: {collection: [documents]}}`. Writes go to a
// sibling `.tmp` file which is then renamed over the target.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::oid;
use super::query::{apply_update, matches};
use super::{Document, DocumentStore, StoreError};

/// Database used when the URI names none.
pub const DEFAULT_DATABASE: &str = "test";

const MAX_DATABASE_NAME: usize = 64;
const MAX_COLLECTION_NAME: usize = 120;

type Collections = BTreeMap<String, Vec<Document>>;
type Databases = BTreeMap<String, Collections>;

// ─── URI ─────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Target {
    Memory(String),
    File(PathBuf),
}

fn parse_uri(uri: &str) -> Result<Target, StoreError> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(StoreError::EmptyUri);
    }

    if let Some(db) = uri.strip_prefix("mem://") {
        let db = db.trim_end_matches('/');
        let db = if db.is_empty() { DEFAULT_DATABASE } else { db };
        validate_database_name(db)?;
        return Ok(Target::Memory(db.to_string()));
    }
    if let Some(path) = uri.strip_prefix("file://") {
        if path.is_empty() {
            return Err(StoreError::UnsupportedUri(uri.to_string()));
        }
        return Ok(Target::File(PathBuf::from(path)));
    }

    let path = Path::new(uri);
    if !uri.contains("://") && path.extension().is_some_and(|ext| ext == "json") {
        return Ok(Target::File(path.to_path_buf()));
    }
    Err(StoreError::UnsupportedUri(uri.to_string()))
}

// ─── Names ───────────────────────────────────────────────────────────────────

fn invalid(name: &str, reason: &'static str) -> StoreError {
    StoreError::InvalidName {
        name: name.to_string(),
        reason,
    }
}

fn validate_database_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(invalid(name, "must not be empty"));
    }
    if name.len() > MAX_DATABASE_NAME {
        return Err(invalid(name, "too long"));
    }
    if name.contains(['/', '\\', '.', ' ', '"', '$', '\0']) {
        return Err(invalid(name, "must not contain / \\ . space \" $"));
    }
    Ok(())
}

fn validate_collection_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(invalid(name, "must not be empty"));
    }
    if name.len() > MAX_COLLECTION_NAME {
        return Err(invalid(name, "too long"));
    }
    if name.contains(['$', '\0']) {
        return Err(invalid(name, "must not contain '$'"));
    }
    if name.starts_with("system.") {
        return Err(invalid(name, "the system. prefix is reserved"));
    }
    Ok(())
}

// ─── File backing ────────────────────────────────────────────────────────────

fn load(path: &Path) -> Result<Databases, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "store file missing, starting empty");
            let mut databases = Databases::new();
            databases.insert(DEFAULT_DATABASE.to_string(), Collections::new());
            return Ok(databases);
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn save(path: &Path, databases: &Databases) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let text = serde_json::to_string_pretty(databases)
        .map_err(|e| io_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, text).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

/// Databases held in process, optionally backed by a JSON file.
///
/// Connect with `mem://[db]` for a scratch store, or `file://<path>` / a
/// `.json` path to load and persist one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    databases: Databases,
    backing: Option<PathBuf>,
    connected: bool,
}

impl MemoryStore {
    /// An empty, disconnected store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn ensure_connected(&self) -> Result<(), StoreError> {
        if self.connected {
            Ok(())
        } else {
            Err(StoreError::NotConnected)
        }
    }

    fn database(&self, db: &str) -> Result<&Collections, StoreError> {
        self.ensure_connected()?;
        self.databases
            .get(db)
            .ok_or_else(|| StoreError::UnknownDatabase(db.to_string()))
    }

    fn collection(&self, db: &str, coll: &str) -> Result<&Vec<Document>, StoreError> {
        self.database(db)?
            .get(coll)
            .ok_or_else(|| StoreError::UnknownCollection(coll.to_string()))
    }

    fn collection_mut(&mut self, db: &str, coll: &str) -> Result<&mut Vec<Document>, StoreError> {
        self.ensure_connected()?;
        self.databases
            .get_mut(db)
            .ok_or_else(|| StoreError::UnknownDatabase(db.to_string()))?
            .get_mut(coll)
            .ok_or_else(|| StoreError::UnknownCollection(coll.to_string()))
    }

    fn persist(&self) -> Result<(), StoreError> {
        match &self.backing {
            Some(path) => save(path, &self.databases).inspect_err(|e| warn!("persist failed: {e}")),
            None => Ok(()),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn connect(&mut self, uri: &str) -> Result<(), StoreError> {
        match parse_uri(uri)? {
            Target::Memory(db) => {
                if self.backing.take().is_some() {
                    self.databases.clear();
                }
                self.databases.entry(db).or_default();
            }
            Target::File(path) => {
                self.databases = load(&path)?;
                self.backing = Some(path);
            }
        }
        self.connected = true;
        info!(uri = uri.trim(), databases = self.databases.len(), "connected");
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.connected {
            info!("disconnected");
        }
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn list_databases(&self) -> Result<Vec<String>, StoreError> {
        self.ensure_connected()?;
        Ok(self.databases.keys().cloned().collect())
    }

    fn list_collections(&self, db: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.database(db)?.keys().cloned().collect())
    }

    fn create_collection(&mut self, db: &str, name: &str) -> Result<(), StoreError> {
        self.ensure_connected()?;
        validate_database_name(db)?;
        validate_collection_name(name)?;

        let collections = self.databases.entry(db.to_string()).or_default();
        if collections.contains_key(name) {
            return Err(StoreError::CollectionExists(name.to_string()));
        }
        collections.insert(name.to_string(), Vec::new());
        info!(db, collection = name, "collection created");
        self.persist()
    }

    fn drop_collection(&mut self, db: &str, name: &str) -> Result<(), StoreError> {
        self.ensure_connected()?;
        let removed = self
            .databases
            .get_mut(db)
            .ok_or_else(|| StoreError::UnknownDatabase(db.to_string()))?
            .remove(name);
        if removed.is_none() {
            return Err(StoreError::UnknownCollection(name.to_string()));
        }
        info!(db, collection = name, "collection dropped");
        self.persist()
    }

    fn count(&self, db: &str, coll: &str, filter: &Document) -> Result<u64, StoreError> {
        let docs = self.collection(db, coll)?;
        let n = docs.iter().filter(|d| matches(d, filter)).count();
        debug!(db, collection = coll, n, "count");
        Ok(n as u64)
    }

    fn find(
        &self,
        db: &str,
        coll: &str,
        filter: &Document,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let docs = self.collection(db, coll)?;
        debug!(db, collection = coll, skip, limit, "find");
        Ok(docs
            .iter()
            .filter(|d| matches(d, filter))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    fn insert(&mut self, db: &str, coll: &str, mut doc: Document) -> Result<Value, StoreError> {
        self.ensure_connected()?;
        validate_database_name(db)?;
        validate_collection_name(coll)?;

        let id = match doc.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = oid::new_id();
                doc.shift_insert(0, "_id".to_string(), id.clone());
                id
            }
        };
        self.databases
            .entry(db.to_string())
            .or_default()
            .entry(coll.to_string())
            .or_default()
            .push(doc);
        info!(db, collection = coll, %id, "inserted");
        self.persist()?;
        Ok(id)
    }

    fn update(
        &mut self,
        db: &str,
        coll: &str,
        filter: &Document,
        update: &Document,
        many: bool,
    ) -> Result<u64, StoreError> {
        let docs = self.collection_mut(db, coll)?;

        // Applied to a copy so a failing document leaves the collection as it was.
        let mut staged = docs.clone();
        let mut modified = 0u64;
        for doc in staged.iter_mut().filter(|d| matches(d, filter)) {
            if apply_update(doc, update)? {
                modified += 1;
            }
            if !many {
                break;
            }
        }
        *docs = staged;

        info!(db, collection = coll, modified, "updated");
        if modified > 0 {
            self.persist()?;
        }
        Ok(modified)
    }

    fn delete(
        &mut self,
        db: &str,
        coll: &str,
        filter: &Document,
        many: bool,
    ) -> Result<u64, StoreError> {
        let docs = self.collection_mut(db, coll)?;
        let before = docs.len();
        if many {
            docs.retain(|d| !matches(d, filter));
        } else if let Some(i) = docs.iter().position(|d| matches(d, filter)) {
            docs.remove(i);
        }
        let deleted = (before - docs.len()) as u64;

        info!(db, collection = coll, deleted, "deleted");
        if deleted > 0 {
            self.persist()?;
        }
        Ok(deleted)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
