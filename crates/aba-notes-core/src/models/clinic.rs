//! Clinic model.

use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::text_value;
use crate::repository::Record;

/// A location where sessions take place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clinic {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl Clinic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl Record for Clinic {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            address: row.get("address")?,
        })
    }

    fn fields(&self) -> Vec<(&'static str, Value)> {
        let mut fields = vec![("name", text_value(&self.name))];
        if let Some(address) = &self.address {
            fields.push(("address", text_value(address)));
        }
        fields
    }
}
