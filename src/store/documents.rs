//! SQLite-backed JSON document store
//!
//! Every document lives in one `documents` table, tagged with its collection.
//! Bodies are stored as JSON text and always carry their `_id`. Reads return
//! documents in insertion order.

use crate::{
    auth::models::UserRecord,
    store::{Collection, CredentialStore},
};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Params};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;

CREATE TABLE IF NOT EXISTS documents (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    UNIQUE (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection
    ON documents(collection, seq);
"#;

/// Result of a single insert, shaped like the document-database reply clients expect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

/// Result of a single `$set` update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Document storage with SQLite backend
pub struct DocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl DocumentStore {
    /// Open (or create) the store at `db_path`
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_db()?;

        info!("📦 Document store opened at: {}", path.display());
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        self.conn
            .lock()
            .execute_batch(SCHEMA_SQL)
            .context("Failed to initialize database schema")
    }

    /// Insert a document. A client-supplied `_id` of any non-null type is
    /// kept as written and keyed by its string form; otherwise a fresh one
    /// is generated.
    pub fn insert(&self, collection: Collection, mut doc: Map<String, Value>) -> Result<InsertOneResult> {
        let id = match doc.get("_id") {
            None | Some(Value::Null) => {
                let id = new_document_id();
                doc.insert("_id".to_string(), Value::String(id.clone()));
                id
            }
            Some(supplied) => document_key(supplied),
        };

        let body = serde_json::to_string(&doc)?;

        self.conn
            .lock()
            .execute(
                "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
                params![collection.as_str(), id, body],
            )
            .with_context(|| format!("Failed to insert into {}", collection.as_str()))?;

        debug!("Inserted {} document {}", collection.as_str(), id);

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    pub fn find_all(&self, collection: Collection) -> Result<Vec<Value>> {
        self.query_documents(
            "SELECT body FROM documents WHERE collection = ?1 ORDER BY seq",
            params![collection.as_str()],
        )
    }

    pub fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let mut docs = self.query_documents(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection.as_str(), id],
        )?;
        Ok(docs.pop())
    }

    /// All documents whose top-level `field` is the string `value`
    pub fn find_by_field(&self, collection: Collection, field: &str, value: &str) -> Result<Vec<Value>> {
        self.query_documents(
            "SELECT body FROM documents
             WHERE collection = ?1 AND json_extract(body, ?2) = ?3
             ORDER BY seq",
            params![collection.as_str(), field_path(field), value],
        )
    }

    pub fn find_one_by_field(&self, collection: Collection, field: &str, value: &str) -> Result<Option<Value>> {
        let docs = self.query_documents(
            "SELECT body FROM documents
             WHERE collection = ?1 AND json_extract(body, ?2) = ?3
             ORDER BY seq LIMIT 1",
            params![collection.as_str(), field_path(field), value],
        )?;
        Ok(docs.into_iter().next())
    }

    /// `$set` the top-level keys of `patch` on the first document whose
    /// `field` equals `value`. `_id` is immutable and skipped.
    pub fn update_one_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
        patch: Map<String, Value>,
    ) -> Result<UpdateResult> {
        let conn = self.conn.lock();

        let found: Option<(i64, String)> = conn
            .query_row(
                "SELECT seq, body FROM documents
                 WHERE collection = ?1 AND json_extract(body, ?2) = ?3
                 ORDER BY seq LIMIT 1",
                params![collection.as_str(), field_path(field), value],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((seq, body)) = found else {
            return Ok(UpdateResult::default());
        };

        let mut doc: Map<String, Value> =
            serde_json::from_str(&body).context("Corrupt document body")?;

        let mut modified = false;
        for (key, new_value) in patch {
            if key == "_id" {
                continue;
            }
            if doc.get(&key) != Some(&new_value) {
                doc.insert(key, new_value);
                modified = true;
            }
        }

        if modified {
            conn.execute(
                "UPDATE documents SET body = ?1 WHERE seq = ?2",
                params![serde_json::to_string(&doc)?, seq],
            )
            .with_context(|| format!("Failed to update {} document", collection.as_str()))?;
        }

        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    fn query_documents<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Value>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;

        let bodies = stmt
            .query_map(params, |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).context("Corrupt document body"))
            .collect()
    }
}

impl CredentialStore for DocumentStore {
    fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let doc = self.find_one_by_field(Collection::User, "email", email)?;
        Ok(doc.as_ref().and_then(UserRecord::from_document))
    }
}

fn field_path(field: &str) -> String {
    format!("$.\"{}\"", field)
}

/// Lookup key for an `_id`: strings as-is, anything else as compact JSON.
fn document_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}
