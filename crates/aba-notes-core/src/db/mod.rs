//! Database layer for ABA session notes.

mod schema;

pub use schema::*;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Connection lock poisoned: {0}")]
    LockPoisoned(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Shared handle to the SQLite file.
///
/// Cloning is cheap; every clone talks to the same connection. Callers get the
/// connection only for the duration of [`Database::with_conn`].
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    ///
    /// Bundled SQLite starts with foreign key enforcement on; it is switched
    /// off so references are only checked by the session note service.
    fn initialize(&self) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.pragma_update(None, "foreign_keys", false)?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
    }

    /// Run `f` with the connection held; the lock is released on every exit path.
    pub fn with_conn<T, F>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DbError::LockPoisoned(e.to_string()))?;
        f(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .with_conn(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .filter_map(|r| r.ok())
                    .collect();
                Ok(names)
            })
            .unwrap();

        assert!(tables.contains(&"bcbas".to_string()));
        assert!(tables.contains(&"patients".to_string()));
        assert!(tables.contains(&"clinics".to_string()));
        assert!(tables.contains(&"session_notes".to_string()));
    }

    #[test]
    fn test_foreign_keys_not_enforced() {
        let db = Database::open_in_memory().unwrap();
        let enforced: i64 = db
            .with_conn(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(enforced, 0);

        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO session_notes (bcba, patient, apt_date) VALUES (7, 8, '2024-05-01 14:00:00+00:00')",
                [],
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_reopen_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session_notes.db");

        {
            let db = Database::open(&path).unwrap();
            db.with_conn(|conn| {
                conn.execute("INSERT INTO bcbas (name) VALUES ('Dr. A')", [])?;
                Ok(())
            })
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM bcbas", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_clones_share_connection() {
        let db = Database::open_in_memory().unwrap();
        let other = db.clone();

        db.with_conn(|conn| {
            conn.execute("INSERT INTO clinics (name) VALUES ('Sunshine')", [])?;
            Ok(())
        })
        .unwrap();

        let name: String = other
            .with_conn(|conn| Ok(conn.query_row("SELECT name FROM clinics", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(name, "Sunshine");
    }
}
