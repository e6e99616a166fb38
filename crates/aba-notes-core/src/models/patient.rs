//! Patient models.

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{date_value, text_value};
use crate::repository::Record;

/// A client receiving ABA therapy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Assigned by storage on create
    #[serde(default)]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    /// Date of birth
    #[serde(rename = "DOB")]
    pub dob: NaiveDate,
    /// Diagnostic code (e.g. "F84.0"), free-form
    #[serde(rename = "ICD", default)]
    pub icd: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Patient {
    /// Create a new patient with required fields.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, dob: NaiveDate) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            dob,
            icd: None,
            address: None,
        }
    }

    /// "First Last", as shown on session note listings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Record for Patient {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            dob: row.get("DOB")?,
            icd: row.get("ICD")?,
            address: row.get("address")?,
        })
    }

    fn fields(&self) -> Vec<(&'static str, Value)> {
        let mut fields = vec![
            ("first_name", text_value(&self.first_name)),
            ("last_name", text_value(&self.last_name)),
            ("DOB", date_value(self.dob)),
        ];
        if let Some(icd) = &self.icd {
            fields.push(("ICD", text_value(icd)));
        }
        if let Some(address) = &self.address {
            fields.push(("address", text_value(address)));
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn john() -> Patient {
        Patient::new("John", "Doe", NaiveDate::from_ymd_opt(2015, 1, 1).unwrap())
    }

    #[test]
    fn test_full_name() {
        assert_eq!(john().full_name(), "John Doe");
    }

    #[test]
    fn test_wire_names() {
        let mut patient = john();
        patient.icd = Some("F84.0".into());

        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["DOB"], "2015-01-01");
        assert_eq!(json["ICD"], "F84.0");
        assert!(json.get("dob").is_none());
    }

    #[test]
    fn test_fields_store_date_as_iso() {
        let fields = john().fields();
        let dob = fields.iter().find(|(c, _)| *c == "DOB").unwrap();
        assert_eq!(dob.1, Value::Text("2015-01-01".into()));
        assert!(!fields.iter().any(|(c, _)| *c == "ICD"));
    }
}
