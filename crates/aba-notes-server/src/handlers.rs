//! Route handlers.
//!
//! Handlers translate a request into one service call and answer with its
//! envelope. Extractor rejections (bad JSON, missing fields, non-numeric ids)
//! become 400 envelopes instead of axum's plain-text errors.
//!
//! Storage calls are synchronous SQLite work and run on the blocking pool.

use aba_notes_core::{Bcba, Clinic, Patient, ServiceResult, Services, SessionNoteDetails};
use aba_notes_llm::NoteGenerationResponse;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Value};

use crate::requests::{
    BcbaQuery, CreateBcbaRequest, CreatePatientRequest, CreateSessionNoteRequest,
    EditSessionNoteRequest,
};
use crate::response::Envelope;
use crate::state::AppState;

/// Run a storage call on the blocking pool; a panicking call is a 500.
async fn blocking<T, F>(state: &AppState, call: F) -> Envelope<T>
where
    T: Send + 'static,
    F: FnOnce(&Services) -> ServiceResult<T> + Send + 'static,
{
    let services = state.services().clone();
    match tokio::task::spawn_blocking(move || call(&services)).await {
        Ok(result) => result.into(),
        Err(error) => {
            tracing::error!(%error, "storage task failed");
            Envelope(ServiceResult::internal_error("Internal server error"))
        }
    }
}

/// `GET /`
pub async fn health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

// =========================================================================
// Session notes
// =========================================================================

/// `GET /api/session-notes?bcba_id=N`
pub async fn list_session_notes(
    State(state): State<AppState>,
    query: Result<Query<BcbaQuery>, QueryRejection>,
) -> Envelope<Vec<SessionNoteDetails>> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return Envelope::bad_request(rejection.body_text()),
    };
    blocking(&state, move |services| {
        services.session_notes.get_by_bcba_with_details(query.bcba_id)
    })
    .await
}

/// `GET /api/session-notes/{id}`
pub async fn get_session_note(
    State(state): State<AppState>,
    note_id: Result<Path<i64>, PathRejection>,
) -> Envelope<SessionNoteDetails> {
    let Path(note_id) = match note_id {
        Ok(path) => path,
        Err(rejection) => return Envelope::bad_request(rejection.body_text()),
    };
    blocking(&state, move |services| {
        services.session_notes.get_by_id_with_details(note_id)
    })
    .await
}

/// `POST /api/session-notes`
pub async fn create_session_note(
    State(state): State<AppState>,
    body: Result<Json<CreateSessionNoteRequest>, JsonRejection>,
) -> Envelope<i64> {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return Envelope::bad_request(rejection.body_text()),
    };
    blocking(&state, move |services| {
        services.session_notes.create_with_validation(
            request.bcba,
            request.patient_id,
            request.notes,
            request.clinic_id,
            request.apt_date,
            request.duration,
        )
    })
    .await
}

/// `PUT /api/session-notes/{id}`
///
/// Supplied fields are laid over the stored note; a missing note is the same
/// 404 as `GET`.
pub async fn edit_session_note(
    State(state): State<AppState>,
    note_id: Result<Path<i64>, PathRejection>,
    body: Result<Json<EditSessionNoteRequest>, JsonRejection>,
) -> Envelope<()> {
    let Path(note_id) = match note_id {
        Ok(path) => path,
        Err(rejection) => return Envelope::bad_request(rejection.body_text()),
    };
    let Json(edit) = match body {
        Ok(body) => body,
        Err(rejection) => return Envelope::bad_request(rejection.body_text()),
    };

    blocking(&state, move |services| {
        let notes = &services.session_notes;
        notes
            .get_by_id(note_id)
            .and_then(|existing| notes.update(note_id, &edit.merge_into(existing)))
    })
    .await
}

/// `DELETE /api/session-notes/{id}`
pub async fn delete_session_note(
    State(state): State<AppState>,
    note_id: Result<Path<i64>, PathRejection>,
) -> Envelope<()> {
    let Path(note_id) = match note_id {
        Ok(path) => path,
        Err(rejection) => return Envelope::bad_request(rejection.body_text()),
    };
    blocking(&state, move |services| services.session_notes.delete(note_id)).await
}

// =========================================================================
// Patients, clinics, BCBAs
// =========================================================================

/// `GET /api/patients`
pub async fn list_patients(State(state): State<AppState>) -> Envelope<Vec<Patient>> {
    blocking(&state, |services| services.patients.get_all()).await
}

/// `POST /api/patients`
pub async fn create_patient(
    State(state): State<AppState>,
    body: Result<Json<CreatePatientRequest>, JsonRejection>,
) -> Envelope<i64> {
    match body {
        Ok(Json(request)) => {
            let patient = Patient::from(request);
            blocking(&state, move |services| services.patients.create(&patient)).await
        }
        Err(rejection) => Envelope::bad_request(rejection.body_text()),
    }
}

/// `GET /api/clinics`
pub async fn list_clinics(State(state): State<AppState>) -> Envelope<Vec<Clinic>> {
    blocking(&state, |services| services.clinics.get_all()).await
}

/// `GET /api/bcbas`
pub async fn list_bcbas(State(state): State<AppState>) -> Envelope<Vec<Bcba>> {
    blocking(&state, |services| services.bcbas.get_all()).await
}

/// `POST /api/bcbas`
pub async fn create_bcba(
    State(state): State<AppState>,
    body: Result<Json<CreateBcbaRequest>, JsonRejection>,
) -> Envelope<i64> {
    match body {
        Ok(Json(request)) => {
            let bcba = Bcba::from(request);
            blocking(&state, move |services| services.bcbas.create(&bcba)).await
        }
        Err(rejection) => Envelope::bad_request(rejection.body_text()),
    }
}

// =========================================================================
// Note drafting
// =========================================================================

/// `POST /api/llm`
///
/// The body is handed to the note taker unparsed so its own validation
/// produces the `Validation error: ...` envelope.
pub async fn draft_note(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Envelope<NoteGenerationResponse> {
    match body {
        Ok(Json(data)) => state.note_taker().process_request(data).await.into(),
        Err(rejection) => Envelope(ServiceResult::bad_request(format!(
            "Validation error: {}",
            rejection.body_text()
        ))),
    }
}
