//! Session note models.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{datetime_value, text_value};
use crate::repository::Record;

/// Shown in place of a clinic name when a note has no clinic.
pub const NO_CLINIC: &str = "No Clinic";

/// Clinical record of one therapy appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionNote {
    #[serde(default)]
    pub id: Option<i64>,
    /// BCBA id
    pub bcba: i64,
    /// Patient id
    pub patient: i64,
    /// Clinic id, if the session happened at one
    #[serde(default)]
    pub clinic: Option<i64>,
    pub apt_date: DateTime<Utc>,
    /// Minutes
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SessionNote {
    pub fn new(bcba: i64, patient: i64, apt_date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            bcba,
            patient,
            clinic: None,
            apt_date,
            duration: None,
            notes: None,
        }
    }
}

impl Record for SessionNote {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            bcba: row.get("bcba")?,
            patient: row.get("patient")?,
            clinic: row.get("clinic")?,
            apt_date: row.get("apt_date")?,
            duration: row.get("duration")?,
            notes: row.get("notes")?,
        })
    }

    fn fields(&self) -> Vec<(&'static str, Value)> {
        let mut fields = vec![
            ("bcba", Value::Integer(self.bcba)),
            ("patient", Value::Integer(self.patient)),
        ];
        if let Some(clinic) = self.clinic {
            fields.push(("clinic", Value::Integer(clinic)));
        }
        fields.push(("apt_date", datetime_value(self.apt_date)));
        if let Some(duration) = self.duration {
            fields.push(("duration", Value::Integer(duration)));
        }
        if let Some(notes) = &self.notes {
            fields.push(("notes", text_value(notes)));
        }
        fields
    }
}

/// A session note joined with the display names of what it references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionNoteDetails {
    #[serde(flatten)]
    pub note: SessionNote,
    /// "First Last"
    pub patient_name: String,
    /// Clinic name, or [`NO_CLINIC`]
    pub clinic_name: String,
    pub bcba_name: String,
}

impl SessionNoteDetails {
    /// Build from a row of the detail join, which selects the note columns
    /// followed by `patient_first_name`, `patient_last_name`, `clinic_name` and
    /// `bcba_name`.
    pub(crate) fn from_joined_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let first: String = row.get("patient_first_name")?;
        let last: String = row.get("patient_last_name")?;
        let clinic_name: Option<String> = row.get("clinic_name")?;

        Ok(Self {
            note: SessionNote::from_row(row)?,
            patient_name: format!("{} {}", first, last),
            clinic_name: clinic_name.unwrap_or_else(|| NO_CLINIC.to_string()),
            bcba_name: row.get("bcba_name")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn note() -> SessionNote {
        let apt = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        SessionNote::new(1, 2, apt)
    }

    #[test]
    fn test_fields_omit_absent_optionals() {
        let columns: Vec<&str> = note().fields().into_iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["bcba", "patient", "apt_date"]);
    }

    #[test]
    fn test_apt_date_serializes_rfc3339() {
        let json = serde_json::to_value(note()).unwrap();
        assert_eq!(json["apt_date"], "2024-03-05T14:30:00Z");
        assert_eq!(json["clinic"], serde_json::Value::Null);
    }

    #[test]
    fn test_details_flatten_note_fields() {
        let details = SessionNoteDetails {
            note: note(),
            patient_name: "John Doe".into(),
            clinic_name: NO_CLINIC.into(),
            bcba_name: "Dr. A".into(),
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["bcba"], 1);
        assert_eq!(json["patient"], 2);
        assert_eq!(json["clinic_name"], "No Clinic");
        assert!(json.get("note").is_none());
    }
}
