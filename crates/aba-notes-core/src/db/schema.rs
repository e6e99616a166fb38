//! SQLite schema definition.

/// Complete database schema.
///
/// Foreign keys are declared but not enforced ([`super::Database`] turns
/// `PRAGMA foreign_keys` off on open); referential checks happen in the
/// session note service at write time. `AUTOINCREMENT` keeps ids from being reused after a
/// delete.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- BCBAs
-- ============================================================================

CREATE TABLE IF NOT EXISTS bcbas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    DOB DATE NOT NULL,
    ICD VARCHAR(15),
    address TEXT
);

-- ============================================================================
-- Clinics
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    address TEXT
);

-- ============================================================================
-- Session Notes
-- ============================================================================

CREATE TABLE IF NOT EXISTS session_notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bcba INTEGER NOT NULL REFERENCES bcbas(id),
    patient INTEGER NOT NULL REFERENCES patients(id),
    clinic INTEGER REFERENCES clinics(id),
    apt_date DATETIME NOT NULL,
    duration INTEGER,                            -- minutes
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_session_notes_bcba ON session_notes(bcba);
"#;

/// A backing table: its name and the columns selected for its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl Table {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }
}

pub const BCBAS: Table = Table {
    name: "bcbas",
    columns: &["id", "name"],
};

pub const PATIENTS: Table = Table {
    name: "patients",
    columns: &["id", "first_name", "last_name", "DOB", "ICD", "address"],
};

pub const CLINICS: Table = Table {
    name: "clinics",
    columns: &["id", "name", "address"],
};

pub const SESSION_NOTES: Table = Table {
    name: "session_notes",
    columns: &["id", "bcba", "patient", "clinic", "apt_date", "duration", "notes"],
};

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_table_columns_match_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        for table in [BCBAS, PATIENTS, CLINICS, SESSION_NOTES] {
            let sql = format!("SELECT {} FROM {}", table.columns.join(", "), table.name);
            assert!(conn.prepare(&sql).is_ok(), "columns of {} should exist", table.name);
        }
    }

    #[test]
    fn test_dangling_reference_is_not_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        // Storage does not guard references; the service layer does.
        let result = conn.execute(
            "INSERT INTO session_notes (bcba, patient, apt_date) VALUES (999, 999, '2025-01-01 10:00:00')",
            [],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_autoincrement_does_not_reuse_ids() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute("INSERT INTO bcbas (name) VALUES ('a')", []).unwrap();
        conn.execute("INSERT INTO bcbas (name) VALUES ('b')", []).unwrap();
        conn.execute("DELETE FROM bcbas WHERE id = 2", []).unwrap();
        conn.execute("INSERT INTO bcbas (name) VALUES ('c')", []).unwrap();

        assert_eq!(conn.last_insert_rowid(), 3);
    }

    #[test]
    fn test_has_column() {
        assert!(PATIENTS.has_column("DOB"));
        assert!(!PATIENTS.has_column("dob"));
    }
}
