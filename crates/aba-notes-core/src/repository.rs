//! Generic table repository.
//!
//! [`SqliteRepository`] maps one [`Record`] type onto one [`Table`]. All five
//! operations answer with a [`ServiceResult`]; storage faults become
//! `Failure(.., 500)` here and never travel further as errors.

use std::marker::PhantomData;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension, Row};

use crate::db::{Database, DbError, DbResult, Table};
use crate::result::ServiceResult;

/// A typed row with an integer `id` primary key.
pub trait Record: Sized {
    /// Id of the record, `None` until storage assigns one.
    fn id(&self) -> Option<i64>;

    /// Build a record from a row selected with the table's columns.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Non-id columns that carry a value. Absent optional fields are left out,
    /// so writes never touch them.
    fn fields(&self) -> Vec<(&'static str, Value)>;
}

/// Repository bound to one table at construction.
pub struct SqliteRepository<R> {
    db: Database,
    table: Table,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for SqliteRepository<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            table: self.table,
            _record: PhantomData,
        }
    }
}

impl<R: Record> SqliteRepository<R> {
    pub fn new(db: Database, table: Table) -> Self {
        Self {
            db,
            table,
            _record: PhantomData,
        }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Fetch one record.
    pub fn get_by_id(&self, record_id: i64) -> ServiceResult<R> {
        match self.find(record_id) {
            Ok(Some(record)) => ServiceResult::success(record),
            Ok(None) => {
                ServiceResult::not_found(format!("Record with ID {} not found", record_id))
            }
            Err(e) => self.storage_fault("fetching record", e),
        }
    }

    /// Fetch every record in id order.
    pub fn get_all(&self) -> ServiceResult<Vec<R>> {
        match self.list() {
            Ok(records) => ServiceResult::success(records),
            Err(e) => self.storage_fault("fetching all records", e),
        }
    }

    /// Insert a record and return the id storage assigned to it.
    ///
    /// Any id already on `record` is ignored.
    pub fn create(&self, record: &R) -> ServiceResult<i64> {
        if let Some(ignored) = record.id() {
            tracing::debug!(table = self.table.name, ignored, "discarding caller-supplied id");
        }
        match self.insert(record) {
            Ok(id) => ServiceResult::success(id),
            Err(e) => self.storage_fault("creating record", e),
        }
    }

    /// Overwrite the present fields of an existing record.
    ///
    /// A missing record yields the same 404 as [`Self::get_by_id`] and nothing
    /// is written.
    pub fn update(&self, record_id: i64, record: &R) -> ServiceResult<()> {
        self.get_by_id(record_id)
            .and_then(|_| match self.write(record_id, record) {
                Ok(()) => ServiceResult::ok(),
                Err(e) => self.storage_fault("updating record", e),
            })
    }

    /// Remove an existing record; a missing record yields 404.
    pub fn delete(&self, record_id: i64) -> ServiceResult<()> {
        self.get_by_id(record_id)
            .and_then(|_| match self.remove(record_id) {
                Ok(()) => ServiceResult::ok(),
                Err(e) => self.storage_fault("deleting record", e),
            })
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT {} FROM {}",
            self.table.columns.join(", "),
            self.table.name
        )
    }

    fn find(&self, record_id: i64) -> DbResult<Option<R>> {
        let sql = format!("{} WHERE id = ?1", self.select_sql());
        self.db.with_conn(|conn| {
            conn.query_row(&sql, [record_id], |row| R::from_row(row))
                .optional()
                .map_err(Into::into)
        })
    }

    fn list(&self) -> DbResult<Vec<R>> {
        let sql = format!("{} ORDER BY id", self.select_sql());
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| R::from_row(row))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    fn insert(&self, record: &R) -> DbResult<i64> {
        let fields = self.checked_fields(record)?;
        let sql = if fields.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table.name)
        } else {
            let columns: Vec<&str> = fields.iter().map(|(column, _)| *column).collect();
            let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{}", i)).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table.name,
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        self.db.with_conn(|conn| {
            conn.execute(&sql, params_from_iter(fields.iter().map(|(_, value)| value)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn write(&self, record_id: i64, record: &R) -> DbResult<()> {
        let mut fields = self.checked_fields(record)?;
        if fields.is_empty() {
            return Ok(());
        }

        let assignments: Vec<String> = fields
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            self.table.name,
            assignments.join(", "),
            fields.len() + 1
        );
        fields.push(("id", Value::Integer(record_id)));

        self.db.with_conn(|conn| {
            conn.execute(&sql, params_from_iter(fields.iter().map(|(_, value)| value)))?;
            Ok(())
        })
    }

    fn remove(&self, record_id: i64) -> DbResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", self.table.name);
        self.db.with_conn(|conn| {
            conn.execute(&sql, [record_id])?;
            Ok(())
        })
    }

    fn checked_fields(&self, record: &R) -> DbResult<Vec<(&'static str, Value)>> {
        let fields = record.fields();
        if let Some((column, _)) = fields
            .iter()
            .find(|(column, _)| *column == "id" || !self.table.has_column(column))
        {
            return Err(DbError::Constraint(format!(
                "column {} cannot be written on {}",
                column, self.table.name
            )));
        }
        Ok(fields)
    }

    fn storage_fault<T>(&self, action: &str, error: DbError) -> ServiceResult<T> {
        tracing::error!(table = self.table.name, %error, "storage fault while {}", action);
        ServiceResult::internal_error(format!("Error {}: {}", action, error))
    }
}
