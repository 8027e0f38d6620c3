//! SQLite-backed document store.
//!
//! Provides persistent storage for:
//! - Owner-scoped JSON documents (exercises, people, sessions)
//! - Key-value store for CLI state (the draft slot list)

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, sort_documents, Store};
use crate::error::{DatabaseError, StoreError};

/// SQLite database implementing [`Store`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/circuitroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> crate::error::Result<Self> {
        let path = data_dir()?.join("circuitroom.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                owner_id    TEXT NOT NULL,
                collection  TEXT NOT NULL,
                id          TEXT NOT NULL,
                data        TEXT NOT NULL,
                PRIMARY KEY (owner_id, collection, id)
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl Store for Database {
    fn fetch_all(
        &self,
        owner_id: &str,
        collection: &str,
        sort_key: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, data FROM documents
             WHERE owner_id = ?1 AND collection = ?2
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![owner_id, collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, data) = row?;
            let mut doc: serde_json::Value =
                serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
                    collection: collection.to_string(),
                    id: id.clone(),
                    source,
                })?;
            if let Some(obj) = doc.as_object_mut() {
                obj.insert("id".into(), serde_json::Value::String(id));
            }
            docs.push(doc);
        }

        if let Some(key) = sort_key {
            sort_documents(&mut docs, key);
        }
        Ok(docs)
    }

    fn save(
        &self,
        owner_id: &str,
        collection: &str,
        id: &str,
        data: &serde_json::Value,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO documents (owner_id, collection, id, data)
             VALUES (?1, ?2, ?3, ?4)",
            params![owner_id, collection, id, data.to_string()],
        )?;
        Ok(())
    }

    fn remove(&self, owner_id: &str, collection: &str, id: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM documents WHERE owner_id = ?1 AND collection = ?2 AND id = ?3",
            params![owner_id, collection, id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_fetch_remove() {
        let db = Database::open_memory().unwrap();
        db.save("me", "people", "b", &json!({"displayName": "Bea", "createdAt": 2}))
            .unwrap();
        db.save("me", "people", "a", &json!({"displayName": "Al", "createdAt": 5}))
            .unwrap();
        db.save("other", "people", "c", &json!({"displayName": "Cy"}))
            .unwrap();

        let docs = db.fetch_all("me", "people", Some("createdAt")).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["id"], "b");
        assert_eq!(docs[1]["displayName"], "Al");

        db.remove("me", "people", "b").unwrap();
        assert_eq!(db.fetch_all("me", "people", None).unwrap().len(), 1);
    }

    #[test]
    fn save_overwrites() {
        let db = Database::open_memory().unwrap();
        db.save("me", "sessions", "s1", &json!({"completed": false}))
            .unwrap();
        db.save("me", "sessions", "s1", &json!({"completed": true}))
            .unwrap();
        let docs = db.fetch_all("me", "sessions", None).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["completed"], true);
    }

    #[test]
    fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circuitroom.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.save("me", "exercises", "e1", &json!({"name": "Curl"}))
                .unwrap();
            db.kv_set("draft", "[]").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.fetch_all("me", "exercises", None).unwrap()[0]["name"], "Curl");
        assert_eq!(db.kv_get("draft").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }
}
