//! HTTP transport for the ABA session notes backend.
//!
//! # Modules
//!
//! - [`config`]: Command line and environment configuration
//! - [`state`]: Shared handler state
//! - [`handlers`]: One handler per route
//! - [`requests`]: Request bodies
//! - [`response`]: Envelope responses and panic handling

pub mod config;
pub mod handlers;
pub mod requests;
pub mod response;
pub mod state;

pub use config::{Cli, Command, SeedArgs, ServerConfig};
pub use response::Envelope;
pub use state::AppState;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the router with every route and the middleware stack.
pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route(
            "/api/session-notes",
            get(handlers::list_session_notes).post(handlers::create_session_note),
        )
        .route(
            "/api/session-notes/{id}",
            get(handlers::get_session_note)
                .put(handlers::edit_session_note)
                .delete(handlers::delete_session_note),
        )
        .route(
            "/api/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route("/api/clinics", get(handlers::list_clinics))
        .route(
            "/api/bcbas",
            get(handlers::list_bcbas).post(handlers::create_bcba),
        )
        .route("/api/llm", post(handlers::draft_note))
        .with_state(state)
        .layer(CatchPanicLayer::custom(response::handle_panic))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured front-end origin, with credentials.
///
/// Credentials rule out wildcards, so methods and headers mirror the request.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origin = match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(error) => {
            tracing::warn!(origin = %config.cors_origin, %error, "ignoring invalid CORS origin");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
