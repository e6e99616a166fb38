//! Envelope responses.
//!
//! Every API route answers with a serialized [`ServiceResult`]. The HTTP
//! status is the envelope's `status_code`.

use std::any::Any;

use aba_notes_core::ServiceResult;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// A [`ServiceResult`] sent as an HTTP response.
#[derive(Debug)]
pub struct Envelope<T>(pub ServiceResult<T>);

impl<T> Envelope<T> {
    /// A 400 envelope for a request that could not be read.
    pub fn bad_request(reason: impl std::fmt::Display) -> Self {
        Envelope(ServiceResult::bad_request(reason.to_string()))
    }
}

impl<T> From<ServiceResult<T>> for Envelope<T> {
    fn from(result: ServiceResult<T>) -> Self {
        Envelope(result)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self.0 {
            ServiceResult::Success(_) => tracing::debug!(status = status.as_u16(), "response data"),
            ServiceResult::Failure { message, .. } => {
                tracing::debug!(status = status.as_u16(), %message, "response error")
            }
        }

        (status, Json(self.0)).into_response()
    }
}

/// Turn a handler panic into a generic 500 envelope.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(%detail, "handler panicked");

    Envelope::<()>(ServiceResult::internal_error("Internal server error")).into_response()
}
