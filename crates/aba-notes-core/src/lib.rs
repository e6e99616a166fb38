//! ABA Notes Core Library
//!
//! Clinical record keeping for Applied Behavior Analysis practices: patients,
//! clinics, BCBAs and the session notes that tie them together.
//!
//! # Architecture
//!
//! ```text
//!                   HTTP handlers / seed / CLI
//!                              │
//!                    ┌─────────▼─────────┐
//!                    │     Services      │  one per entity kind
//!                    │  (session notes:  │
//!                    │  reference checks │
//!                    │  + joined reads)  │
//!                    └─────────┬─────────┘
//!                              │
//!                  ┌───────────▼───────────┐
//!                  │ SqliteRepository<R>   │  get_by_id / get_all /
//!                  │ bound to one Table    │  create / update / delete
//!                  └───────────┬───────────┘
//!                              │
//!                       ┌──────▼──────┐
//!                       │  Database   │  Arc<Mutex<Connection>>
//!                       └─────────────┘
//! ```
//!
//! # Core Principle
//!
//! **Every operation answers with a [`ServiceResult`].** Not-found, validation
//! and storage faults are turned into a failure envelope with a status code at
//! the repository or service boundary; nothing is raised past it.
//!
//! # Modules
//!
//! - [`db`]: SQLite handle and schema
//! - [`models`]: Domain types (Patient, Clinic, Bcba, SessionNote)
//! - [`repository`]: Generic single-table repository
//! - [`services`]: Entity services and the [`Services`] registry
//! - [`result`]: The success/failure envelope
//! - [`seed`]: Demo data generation

pub mod db;
pub mod models;
pub mod repository;
pub mod result;
pub mod seed;
pub mod services;

// Re-export commonly used types
pub use db::{Database, DbError, DbResult};
pub use models::{Bcba, Clinic, Patient, SessionNote, SessionNoteDetails, NO_CLINIC};
pub use repository::{Record, SqliteRepository};
pub use result::{ServiceFailure, ServiceResult};
pub use seed::{seed, SeedOptions, SeedSummary};
pub use services::{
    BcbaService, ClinicService, EntityService, PatientService, SessionNoteService, Services,
};
