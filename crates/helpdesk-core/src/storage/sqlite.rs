use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, OptionalExtension, params};

use super::KeyValueStore;
use crate::error::StorageError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
";

/// Key-value blobs in a single SQLite table. Each `set_raw` is one upsert
/// statement, so a blob is replaced atomically.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(std::time::Duration::from_secs(2))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for SqliteStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let bytes = self
            .conn()
            .query_row(
                "SELECT CAST(value AS BLOB) FROM kv WHERE key = ?1",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        bytes
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|err| StorageError::NotUtf8 {
                    key: key.to_string(),
                    lossy: String::from_utf8_lossy(err.as_bytes()).into_owned(),
                })
            })
            .transpose()
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn().execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn().execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteStore;
    use crate::error::StorageError;
    use crate::storage::KeyValueStore;

    #[test]
    fn upsert_replaces_existing_value() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_raw("tickets", "[]").unwrap();
        store.set_raw("tickets", "[{\"id\":1}]").unwrap();
        assert_eq!(
            store.get_raw("tickets").unwrap().as_deref(),
            Some("[{\"id\":1}]")
        );
    }

    #[test]
    fn remove_absent_key_is_ok() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.remove("missing").unwrap();
        assert!(store.get_raw("missing").unwrap().is_none());
    }

    #[test]
    fn file_backed_store_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("helpdesk.db");
        SqliteStore::open(&path)
            .unwrap()
            .set_raw("helpdesk_all_users", "[]")
            .unwrap();

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_raw("helpdesk_all_users").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn invalid_utf8_value_is_reported_as_corrupt() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO kv (key, value) VALUES ('tickets', CAST(X'5BFFFE5D' AS TEXT))",
                [],
            )
            .unwrap();

        let err = store.get_raw("tickets").unwrap_err();
        assert!(matches!(err, StorageError::NotUtf8 { ref key, .. } if key == "tickets"));
    }
}
