//! Per-entity services.
//!
//! Each service is bound to one table and exposes the five repository
//! operations under the same names. [`Services`] builds one of each from a
//! single [`Database`] at startup.

mod session_notes;

pub use session_notes::SessionNoteService;

use crate::db::{Database, BCBAS, CLINICS, PATIENTS};
use crate::models::{Bcba, Clinic, Patient};
use crate::repository::{Record, SqliteRepository};
use crate::result::ServiceResult;

/// Thin pass-through over a [`SqliteRepository`].
pub struct EntityService<R> {
    repository: SqliteRepository<R>,
}

impl<R> Clone for EntityService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<R: Record> EntityService<R> {
    pub fn new(repository: SqliteRepository<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &SqliteRepository<R> {
        &self.repository
    }

    pub fn get_by_id(&self, record_id: i64) -> ServiceResult<R> {
        self.repository.get_by_id(record_id)
    }

    pub fn get_all(&self) -> ServiceResult<Vec<R>> {
        self.repository.get_all()
    }

    pub fn create(&self, record: &R) -> ServiceResult<i64> {
        self.repository.create(record)
    }

    pub fn update(&self, record_id: i64, record: &R) -> ServiceResult<()> {
        self.repository.update(record_id, record)
    }

    pub fn delete(&self, record_id: i64) -> ServiceResult<()> {
        self.repository.delete(record_id)
    }
}

pub type BcbaService = EntityService<Bcba>;
pub type PatientService = EntityService<Patient>;
pub type ClinicService = EntityService<Clinic>;

/// One service per entity kind, all sharing the same database handle.
#[derive(Clone)]
pub struct Services {
    pub bcbas: BcbaService,
    pub patients: PatientService,
    pub clinics: ClinicService,
    pub session_notes: SessionNoteService,
}

impl Services {
    pub fn new(db: &Database) -> Self {
        let bcbas = EntityService::new(SqliteRepository::new(db.clone(), BCBAS));
        let patients = EntityService::new(SqliteRepository::new(db.clone(), PATIENTS));
        let clinics = EntityService::new(SqliteRepository::new(db.clone(), CLINICS));
        let session_notes = SessionNoteService::new(
            db.clone(),
            bcbas.clone(),
            patients.clone(),
            clinics.clone(),
        );

        Self {
            bcbas,
            patients,
            clinics,
            session_notes,
        }
    }
}
