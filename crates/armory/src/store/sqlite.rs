//! `SQLite`-backed key-value store.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::{migrations, PersistentStore};
use crate::error::{Error, Result};

/// Key-value store persisted in a `SQLite` database.
///
/// The connection sits behind a mutex and every async call runs on tokio's
/// blocking pool, so the store can be shared with the persistence writer.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create a store database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store, mostly useful for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PersistentStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = Arc::clone(&self.conn);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            read_value(&conn, &key)
        })
        .await?
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let key = key.to_string();
        let value = value.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            write_value(&conn, &key, &value)
        })
        .await?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| Error::internal("database connection lock poisoned"))
}

fn read_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    debug!(key, found = value.is_some(), "Read store value");
    Ok(value)
}

fn write_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        r"
        INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        ",
        params![key, value, Utc::now().to_rfc3339()],
    )?;
    debug!(key, bytes = value.len(), "Wrote store value");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("failed to create test store")
    }

    fn temp_db_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("armory_{name}_{}.db", std::process::id()))
    }

    fn cleanup(path: &Path) {
        let _ = std::fs::remove_file(path);
        let _ = std::fs::remove_file(path.with_extension("db-wal"));
        let _ = std::fs::remove_file(path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_in_memory() {
        let store = create_test_store();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = create_test_store();
        assert!(store.get("weapons").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = create_test_store();
        store.set("weapons", "[]").await.unwrap();
        assert_eq!(store.get("weapons").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_set_replaces_value() {
        let store = create_test_store();
        store.set("weapons", "[1]").await.unwrap();
        store.set("weapons", "[2]").await.unwrap();

        assert_eq!(store.get("weapons").await.unwrap().as_deref(), Some("[2]"));

        let conn = lock(&store.conn).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = create_test_store();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();

        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_unicode_value() {
        let store = create_test_store();
        let value = r#"[{"lastName":"Шевченко"}]"#;
        store.set("weapons", value).await.unwrap();
        assert_eq!(store.get("weapons").await.unwrap().as_deref(), Some(value));
    }

    #[tokio::test]
    async fn test_open_file_based_persists() {
        let db_path = temp_db_path("persist");
        cleanup(&db_path);

        let store = SqliteStore::open(&db_path).unwrap();
        store.set("weapons", "[]").await.unwrap();
        assert_eq!(store.path(), db_path);
        drop(store);

        let reopened = SqliteStore::open(&db_path).unwrap();
        assert_eq!(reopened.get("weapons").await.unwrap().as_deref(), Some("[]"));

        drop(reopened);
        cleanup(&db_path);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("armory_test_{}", std::process::id()));
        let nested_path = root.join("nested/armory.db");
        let _ = std::fs::remove_dir_all(&root);

        let store = SqliteStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(store);
        let _ = std::fs::remove_dir_all(&root);
    }
}
