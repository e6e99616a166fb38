//! Request bodies and query parameters.

use aba_notes_core::{Bcba, Patient, SessionNote};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct BcbaQuery {
    pub bcba_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionNoteRequest {
    pub bcba: i64,
    pub patient_id: i64,
    #[serde(default)]
    pub clinic_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub apt_date: Option<DateTime<Utc>>,
    /// Minutes
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Every field optional; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct EditSessionNoteRequest {
    #[serde(default)]
    pub bcba: Option<i64>,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub clinic_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub apt_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EditSessionNoteRequest {
    /// Overlay the supplied fields on `existing`.
    pub fn merge_into(self, existing: SessionNote) -> SessionNote {
        SessionNote {
            id: existing.id,
            bcba: self.bcba.unwrap_or(existing.bcba),
            patient: self.patient_id.unwrap_or(existing.patient),
            clinic: self.clinic_id.or(existing.clinic),
            apt_date: self.apt_date.unwrap_or(existing.apt_date),
            duration: self.duration.or(existing.duration),
            notes: self.notes.or(existing.notes),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    /// A date, or a timestamp whose date part is kept
    #[serde(rename = "DOB", deserialize_with = "date_or_timestamp")]
    pub dob: NaiveDate,
    #[serde(rename = "ICD", default)]
    pub icd: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl From<CreatePatientRequest> for Patient {
    fn from(request: CreatePatientRequest) -> Self {
        Patient {
            id: None,
            first_name: request.first_name,
            last_name: request.last_name,
            dob: request.dob,
            icd: request.icd,
            address: request.address,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBcbaRequest {
    pub name: String,
}

impl From<CreateBcbaRequest> for Bcba {
    fn from(request: CreateBcbaRequest) -> Self {
        Bcba::new(request.name)
    }
}

/// RFC 3339, or a timestamp without offset taken as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => parse_timestamp(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime: {}", value))),
    }
}

fn date_or_timestamp<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(&value).map(|timestamp| timestamp.date_naive()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_dob_accepts_date_or_timestamp() {
        for dob in ["2015-01-01", "2015-01-01T00:00:00", "2015-01-01T08:30:00Z"] {
            let request: CreatePatientRequest = serde_json::from_value(json!({
                "first_name": "John",
                "last_name": "Doe",
                "DOB": dob,
            }))
            .unwrap();
            assert_eq!(request.dob, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(), "{}", dob);
        }
    }

    #[test]
    fn test_dob_rejects_garbage() {
        let result: Result<CreatePatientRequest, _> = serde_json::from_value(json!({
            "first_name": "John",
            "last_name": "Doe",
            "DOB": "January first",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_apt_date_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap();
        for apt_date in ["2024-05-01T14:00:00Z", "2024-05-01T16:00:00+02:00", "2024-05-01T14:00:00"] {
            let request: CreateSessionNoteRequest = serde_json::from_value(json!({
                "bcba": 1,
                "patient_id": 1,
                "apt_date": apt_date,
            }))
            .unwrap();
            assert_eq!(request.apt_date, Some(expected), "{}", apt_date);
        }
    }

    #[test]
    fn test_apt_date_null_is_none() {
        let request: CreateSessionNoteRequest =
            serde_json::from_value(json!({"bcba": 1, "patient_id": 1, "apt_date": null})).unwrap();
        assert_eq!(request.apt_date, None);
    }

    #[test]
    fn test_merge_keeps_unsupplied_fields() {
        let mut existing = SessionNote::new(1, 2, Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap());
        existing.id = Some(9);
        existing.clinic = Some(3);
        existing.notes = Some("before".into());

        let edit = EditSessionNoteRequest {
            duration: Some(75),
            notes: Some("after".into()),
            ..EditSessionNoteRequest::default()
        };
        let merged = edit.merge_into(existing.clone());

        assert_eq!(merged.id, Some(9));
        assert_eq!(merged.bcba, 1);
        assert_eq!(merged.clinic, Some(3));
        assert_eq!(merged.apt_date, existing.apt_date);
        assert_eq!(merged.duration, Some(75));
        assert_eq!(merged.notes.as_deref(), Some("after"));
    }
}
