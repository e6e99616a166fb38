//! Session note service: validated creation and joined reads.

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use super::{BcbaService, ClinicService, EntityService, PatientService};
use crate::db::{Database, DbResult, SESSION_NOTES};
use crate::models::{SessionNote, SessionNoteDetails};
use crate::repository::{Record, SqliteRepository};
use crate::result::ServiceResult;

/// Note columns plus the display names of the referenced rows. Patient and
/// BCBA are inner joins; the clinic is optional.
const DETAILS_SELECT: &str = r#"
    SELECT n.id, n.bcba, n.patient, n.clinic, n.apt_date, n.duration, n.notes,
           p.first_name AS patient_first_name,
           p.last_name AS patient_last_name,
           c.name AS clinic_name,
           b.name AS bcba_name
    FROM session_notes n
    JOIN patients p ON n.patient = p.id
    LEFT OUTER JOIN clinics c ON n.clinic = c.id
    JOIN bcbas b ON n.bcba = b.id
"#;

#[derive(Clone)]
pub struct SessionNoteService {
    notes: EntityService<SessionNote>,
    bcbas: BcbaService,
    patients: PatientService,
    clinics: ClinicService,
}

impl SessionNoteService {
    pub fn new(
        db: Database,
        bcbas: BcbaService,
        patients: PatientService,
        clinics: ClinicService,
    ) -> Self {
        Self {
            notes: EntityService::new(SqliteRepository::new(db, SESSION_NOTES)),
            bcbas,
            patients,
            clinics,
        }
    }

    pub fn get_by_id(&self, note_id: i64) -> ServiceResult<SessionNote> {
        self.notes.get_by_id(note_id)
    }

    pub fn get_all(&self) -> ServiceResult<Vec<SessionNote>> {
        self.notes.get_all()
    }

    /// Insert without checking references.
    pub fn create(&self, note: &SessionNote) -> ServiceResult<i64> {
        self.notes.create(note)
    }

    pub fn update(&self, note_id: i64, note: &SessionNote) -> ServiceResult<()> {
        self.notes.update(note_id, note)
    }

    pub fn delete(&self, note_id: i64) -> ServiceResult<()> {
        self.notes.delete(note_id)
    }

    /// Create a note after confirming the BCBA, the patient and (when given)
    /// the clinic exist, checked in that order.
    ///
    /// The checks and the insert are separate round trips; a referenced row
    /// deleted in between is not detected. `apt_date` defaults to now.
    pub fn create_with_validation(
        &self,
        bcba_id: i64,
        patient_id: i64,
        notes: Option<String>,
        clinic_id: Option<i64>,
        apt_date: Option<DateTime<Utc>>,
        duration: Option<i64>,
    ) -> ServiceResult<i64> {
        require("BCBA", bcba_id, self.bcbas.get_by_id(bcba_id).map(|_| ()))
            .and_then(|_| {
                require(
                    "Patient",
                    patient_id,
                    self.patients.get_by_id(patient_id).map(|_| ()),
                )
            })
            .and_then(|_| match clinic_id {
                Some(clinic_id) => require(
                    "Clinic",
                    clinic_id,
                    self.clinics.get_by_id(clinic_id).map(|_| ()),
                ),
                None => ServiceResult::ok(),
            })
            .and_then(|_| {
                let note = SessionNote {
                    id: None,
                    bcba: bcba_id,
                    patient: patient_id,
                    clinic: clinic_id,
                    apt_date: apt_date.unwrap_or_else(Utc::now),
                    duration,
                    notes,
                };
                self.create(&note)
            })
    }

    /// Every note written by a BCBA, without joins.
    pub fn get_by_bcba(&self, bcba_id: i64) -> ServiceResult<Vec<SessionNote>> {
        let sql = format!(
            "SELECT {} FROM session_notes WHERE bcba = ?1 ORDER BY id",
            SESSION_NOTES.columns.join(", ")
        );
        let result: DbResult<Vec<SessionNote>> = self.database().with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([bcba_id], |row| SessionNote::from_row(row))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        });

        match result {
            Ok(notes) => ServiceResult::success(notes),
            Err(error) => {
                tracing::error!(bcba_id, %error, "failed to fetch session notes for BCBA");
                ServiceResult::internal_error(format!(
                    "Error fetching session notes for BCBA {}: {}",
                    bcba_id, error
                ))
            }
        }
    }

    /// Every note written by a BCBA, with patient, clinic and BCBA names.
    /// An unknown BCBA yields an empty list.
    pub fn get_by_bcba_with_details(&self, bcba_id: i64) -> ServiceResult<Vec<SessionNoteDetails>> {
        let sql = format!("{} WHERE n.bcba = ?1 ORDER BY n.id", DETAILS_SELECT);
        let result: DbResult<Vec<SessionNoteDetails>> = self.database().with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([bcba_id], |row| SessionNoteDetails::from_joined_row(row))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        });

        match result {
            Ok(details) => ServiceResult::success(details),
            Err(error) => {
                tracing::error!(bcba_id, %error, "failed to fetch session note details for BCBA");
                ServiceResult::internal_error(format!(
                    "Error fetching session notes with details for BCBA {}: {}",
                    bcba_id, error
                ))
            }
        }
    }

    /// One note with patient, clinic and BCBA names.
    pub fn get_by_id_with_details(&self, note_id: i64) -> ServiceResult<SessionNoteDetails> {
        let sql = format!("{} WHERE n.id = ?1", DETAILS_SELECT);
        let result: DbResult<Option<SessionNoteDetails>> = self.database().with_conn(|conn| {
            conn.query_row(&sql, [note_id], |row| SessionNoteDetails::from_joined_row(row))
                .optional()
                .map_err(Into::into)
        });

        match result {
            Ok(Some(details)) => ServiceResult::success(details),
            Ok(None) => {
                ServiceResult::not_found(format!("Session note with ID {} not found", note_id))
            }
            Err(error) => {
                tracing::error!(note_id, %error, "failed to fetch session note details");
                ServiceResult::internal_error(format!(
                    "Error fetching session note with details for ID {}: {}",
                    note_id, error
                ))
            }
        }
    }

    fn database(&self) -> &Database {
        self.notes.repository().database()
    }
}

/// Turn a missing reference into a 400. Storage faults pass through.
fn require(kind: &str, id: i64, lookup: ServiceResult<()>) -> ServiceResult<()> {
    match lookup {
        ServiceResult::Failure {
            status_code: 404, ..
        } => {
            tracing::warn!(kind, id, "session note references a missing row");
            ServiceResult::bad_request(format!("{} with ID {} does not exist", kind, id))
        }
        other => other,
    }
}
