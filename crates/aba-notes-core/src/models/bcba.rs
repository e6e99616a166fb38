//! BCBA model.

use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::text_value;
use crate::repository::Record;

/// A Board Certified Behavior Analyst.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bcba {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

impl Bcba {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl Record for Bcba {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![("name", text_value(&self.name))]
    }
}
