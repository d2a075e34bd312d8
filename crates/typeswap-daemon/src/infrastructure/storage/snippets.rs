//! SQLite snippet store.
//!
//! One table:
//!
//! ```sql
//! CREATE TABLE snippets (
//!     id      INTEGER PRIMARY KEY AUTOINCREMENT,
//!     name    TEXT NOT NULL,
//!     trigger TEXT,
//!     content TEXT NOT NULL
//! );
//! ```
//!
//! `list_all` returns rows ordered by `name`, which is the precedence order
//! used when two triggers both match.  Nothing is cached: every call queries
//! the file, so edits made by another process are visible on the next key
//! press.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use typeswap_core::{Snippet, SnippetId, SnippetStore, StoreError};

/// A snippet store backed by one SQLite connection.
pub struct SqliteSnippetStore {
    conn: Mutex<Connection>,
}

impl SqliteSnippetStore {
    /// Opens (or creates) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(StoreError::backend)?;
        }
        let conn = Connection::open(path).map_err(StoreError::backend)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::backend)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.lock()
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS snippets (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    trigger TEXT,
                    content TEXT NOT NULL
                );
                "#,
            )
            .map_err(StoreError::backend)
    }

    /// Inserts a snippet and returns its id.
    pub fn add(&self, name: &str, content: &str, trigger: Option<&str>) -> Result<SnippetId, StoreError> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO snippets (name, content, trigger) VALUES (?1, ?2, ?3)",
            params![name, content, trigger],
        )
        .map_err(StoreError::backend)?;
        Ok(conn.last_insert_rowid())
    }

    /// Replaces every field of an existing snippet.
    pub fn update(
        &self,
        id: SnippetId,
        name: &str,
        content: &str,
        trigger: Option<&str>,
    ) -> Result<(), StoreError> {
        let affected = self
            .lock()
            .execute(
                "UPDATE snippets SET name = ?1, content = ?2, trigger = ?3 WHERE id = ?4",
                params![name, content, trigger, id],
            )
            .map_err(StoreError::backend)?;
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    pub fn delete(&self, id: SnippetId) -> Result<(), StoreError> {
        let affected = self
            .lock()
            .execute("DELETE FROM snippets WHERE id = ?1", [id])
            .map_err(StoreError::backend)?;
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn row_to_snippet(row: &rusqlite::Row<'_>) -> rusqlite::Result<Snippet> {
    Ok(Snippet {
        id: row.get(0)?,
        name: row.get(1)?,
        content: row.get(2)?,
        trigger: row.get(3)?,
    })
}

impl SnippetStore for SqliteSnippetStore {
    fn list_all(&self) -> Result<Vec<Snippet>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare("SELECT id, name, content, trigger FROM snippets ORDER BY name")
            .map_err(StoreError::backend)?;
        let rows = stmt
            .query_map([], row_to_snippet)
            .map_err(StoreError::backend)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::backend)
    }

    fn get(&self, id: SnippetId) -> Result<Option<Snippet>, StoreError> {
        self.lock()
            .query_row(
                "SELECT id, name, content, trigger FROM snippets WHERE id = ?1",
                [id],
                row_to_snippet,
            )
            .optional()
            .map_err(StoreError::backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        // Arrange
        let store = SqliteSnippetStore::open_in_memory().unwrap();

        // Act
        let id = store.add("signature", "Jane Doe", Some(";sig")).unwrap();
        let snippet = store.get(id).unwrap().expect("row exists");

        // Assert
        assert_eq!(snippet.name, "signature");
        assert_eq!(snippet.content, "Jane Doe");
        assert_eq!(snippet.trigger.as_deref(), Some(";sig"));
    }

    #[test]
    fn test_list_all_is_ordered_by_name() {
        let store = SqliteSnippetStore::open_in_memory().unwrap();
        store.add("zulu", "z", Some(";z")).unwrap();
        store.add("alpha", "a", None).unwrap();
        store.add("mike", "m", Some("")).unwrap();

        let names: Vec<String> = store.list_all().unwrap().into_iter().map(|s| s.name).collect();

        assert_eq!(names, vec!["alpha", "mike", "zulu"]);
    }

    #[test]
    fn test_null_trigger_round_trips_as_none() {
        let store = SqliteSnippetStore::open_in_memory().unwrap();
        let id = store.add("plain", "text", None).unwrap();

        let snippet = store.get(id).unwrap().unwrap();

        assert_eq!(snippet.trigger, None);
        assert_eq!(snippet.active_trigger(), None);
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = SqliteSnippetStore::open_in_memory().unwrap();

        assert_eq!(store.get(42).unwrap(), None);
    }

    #[test]
    fn test_update_and_delete() {
        // Arrange
        let store = SqliteSnippetStore::open_in_memory().unwrap();
        let id = store.add("addr", "1 Main St", Some(";addr")).unwrap();

        // Act
        store.update(id, "address", "2 Main St", Some(";ad")).unwrap();
        let updated = store.get(id).unwrap().unwrap();
        store.delete(id).unwrap();

        // Assert
        assert_eq!(updated.content, "2 Main St");
        assert_eq!(updated.trigger.as_deref(), Some(";ad"));
        assert_eq!(store.get(id).unwrap(), None);
        assert!(matches!(store.delete(id), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update(id, "x", "y", None),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_writes_from_second_connection_are_visible() {
        // Arrange: two stores on the same file, like the daemon and the CLI
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("snippets.db");
        let reader = SqliteSnippetStore::open(&path).unwrap();
        let writer = SqliteSnippetStore::open(&path).unwrap();

        // Act
        writer.add("greeting", "Hello!", Some(";hi")).unwrap();

        // Assert
        let all = reader.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content, "Hello!");
    }
}
