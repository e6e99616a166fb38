//! HTTP API tests against the real router over an in-memory database.

use std::sync::Arc;

use aba_notes_core::{Database, Services};
use aba_notes_llm::{MockGenerator, NoteTaker};
use aba_notes_server::{create_app, AppState, ServerConfig};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

const ORIGIN: HeaderName = HeaderName::from_static("origin");
const REQUEST_METHOD: HeaderName = HeaderName::from_static("access-control-request-method");

fn create_test_server() -> TestServer {
    create_test_server_with(MockGenerator::new())
}

fn create_test_server_with(generator: MockGenerator) -> TestServer {
    let config = ServerConfig::for_testing();
    let db = Database::open(&config.database_path).unwrap();
    let note_taker = NoteTaker::with_generator(config.note_taker_config(), Arc::new(generator));
    let app = create_app(AppState::new(Services::new(&db), note_taker), &config);
    TestServer::new(app).unwrap()
}

/// BCBA 1 "Dr. A" and patient 1 "John Doe".
async fn seed_people(server: &TestServer) {
    server
        .post("/api/bcbas")
        .json(&json!({"name": "Dr. A"}))
        .await
        .assert_status_ok();
    server
        .post("/api/patients")
        .json(&json!({"first_name": "John", "last_name": "Doe", "DOB": "2015-01-01"}))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_health() {
    let server = create_test_server();
    let response = server.get("/").await;

    response.assert_status_ok();
    response.assert_json(&json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_create_and_list_bcbas() {
    let server = create_test_server();

    let response = server.post("/api/bcbas").json(&json!({"name": "Dr. A"})).await;
    response.assert_json(&json!({"success": true, "status_code": 200, "data": 1}));

    let body: Value = server.get("/api/bcbas").await.json();
    assert_eq!(body["data"], json!([{"id": 1, "name": "Dr. A"}]));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_patient_wire_names() {
    let server = create_test_server();
    server
        .post("/api/patients")
        .json(&json!({
            "first_name": "John",
            "last_name": "Doe",
            "DOB": "2015-01-01T00:00:00",
            "ICD": "F84.0",
        }))
        .await
        .assert_status_ok();

    let body: Value = server.get("/api/patients").await.json();
    let patient = &body["data"][0];
    assert_eq!(patient["DOB"], "2015-01-01");
    assert_eq!(patient["ICD"], "F84.0");
    assert_eq!(patient["address"], Value::Null);
}

#[tokio::test]
async fn test_clinics_empty_list() {
    let server = create_test_server();
    let body: Value = server.get("/api/clinics").await.json();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_session_note_lifecycle() {
    let server = create_test_server();
    seed_people(&server).await;

    let created: Value = server
        .post("/api/session-notes")
        .json(&json!({"bcba": 1, "patient_id": 1, "duration": 60, "notes": "x"}))
        .await
        .json();
    assert_eq!(created["data"], 1);

    let response = server.get("/api/session-notes/1").await;
    response.assert_status_ok();
    let note: Value = response.json();
    assert_eq!(note["data"]["bcba"], 1);
    assert_eq!(note["data"]["patient"], 1);
    assert_eq!(note["data"]["clinic"], Value::Null);
    assert_eq!(note["data"]["duration"], 60);
    assert_eq!(note["data"]["clinic_name"], "No Clinic");
    assert_eq!(note["data"]["patient_name"], "John Doe");
    assert_eq!(note["data"]["bcba_name"], "Dr. A");

    server
        .put("/api/session-notes/1")
        .json(&json!({"duration": 90}))
        .await
        .assert_json(&json!({"success": true, "status_code": 200, "data": null}));
    let note: Value = server.get("/api/session-notes/1").await.json();
    assert_eq!(note["data"]["duration"], 90);
    assert_eq!(note["data"]["notes"], "x");

    server.delete("/api/session-notes/1").await.assert_status_ok();
    let response = server.get("/api/session-notes/1").await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({
        "success": false,
        "status_code": 404,
        "error": "Session note with ID 1 not found",
    }));
}

#[tokio::test]
async fn test_session_notes_by_bcba() {
    let server = create_test_server();
    seed_people(&server).await;
    for _ in 0..2 {
        server
            .post("/api/session-notes")
            .json(&json!({"bcba": 1, "patient_id": 1, "apt_date": "2024-05-01T14:00:00Z"}))
            .await
            .assert_status_ok();
    }

    let body: Value = server
        .get("/api/session-notes")
        .add_query_param("bcba_id", 1)
        .await
        .json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["apt_date"], "2024-05-01T14:00:00Z");

    let body: Value = server
        .get("/api/session-notes")
        .add_query_param("bcba_id", 99)
        .await
        .json();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_create_note_unknown_bcba() {
    let server = create_test_server();
    seed_people(&server).await;

    let response = server
        .post("/api/session-notes")
        .json(&json!({"bcba": 999, "patient_id": 1}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "success": false,
        "status_code": 400,
        "error": "BCBA with ID 999 does not exist",
    }));
}

#[tokio::test]
async fn test_edit_missing_note_is_404() {
    let server = create_test_server();
    let response = server
        .put("/api/session-notes/5")
        .json(&json!({"notes": "ghost"}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Record with ID 5 not found");
}

#[tokio::test]
async fn test_delete_missing_note_is_404() {
    let server = create_test_server();
    server
        .delete("/api/session-notes/3")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_requests_are_400_envelopes() {
    let server = create_test_server();

    let response = server.get("/api/session-notes").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["status_code"], 400);

    server
        .get("/api/session-notes/abc")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/session-notes")
        .json(&json!({"patient_id": 1}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/bcbas")
        .text("{not json")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/patients")
        .json(&json!({"first_name": "John", "last_name": "Doe", "DOB": "soon"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_draft_note() {
    let server = create_test_server();

    let response = server
        .post("/api/llm")
        .json(&json!({
            "observations": "Client tacted 8 colors",
            "context": {"client_name": "John Doe", "session_duration": 60},
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["model_used"], "openai:gpt-4o-2024-05-13");
    assert_eq!(body["data"]["template_used"], true);
    let note = body["data"]["generated_note"].as_str().unwrap();
    assert!(note.contains("Client tacted 8 colors"));
    assert!(note.contains("Session Duration: 60 minutes"));
}

#[tokio::test]
async fn test_draft_note_validation() {
    let server = create_test_server();

    let response = server.post("/api/llm").json(&json!({"model_type": "openai"})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Validation error: "));
}

#[tokio::test]
async fn test_draft_note_backend_failure() {
    let server = create_test_server_with(MockGenerator::failing(503, "overloaded"));

    let response = server.post("/api/llm").json(&json!({"observations": "x"})).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Note generation failed: Model backend returned 503: overloaded"
    );
}

#[tokio::test]
async fn test_cors_allows_front_end_with_credentials() {
    let server = create_test_server();

    let response = server
        .method(Method::OPTIONS, "/api/bcbas")
        .add_header(ORIGIN, HeaderValue::from_static("http://localhost:3000"))
        .add_header(REQUEST_METHOD, HeaderValue::from_static("POST"))
        .await;

    assert_eq!(
        response.header("access-control-allow-origin"),
        "http://localhost:3000"
    );
    assert_eq!(response.header("access-control-allow-credentials"), "true");
}

#[tokio::test]
async fn test_records_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        database_path: dir.path().join("session_notes.db"),
        ..ServerConfig::for_testing()
    };
    let start = || {
        let db = Database::open(&config.database_path).unwrap();
        let note_taker =
            NoteTaker::with_generator(config.note_taker_config(), Arc::new(MockGenerator::new()));
        TestServer::new(create_app(AppState::new(Services::new(&db), note_taker), &config)).unwrap()
    };

    start()
        .post("/api/bcbas")
        .json(&json!({"name": "Dr. A"}))
        .await
        .assert_status_ok();

    let body: Value = start().get("/api/bcbas").await.json();
    assert_eq!(body["data"], json!([{"id": 1, "name": "Dr. A"}]));
}
