//! Uniform outcome envelope for service operations.
//!
//! Every service call answers with a [`ServiceResult`] instead of returning an
//! error type: not-found, validation and storage faults all travel as a
//! [`ServiceResult::Failure`] carrying an HTTP-style status code.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// Status reported for every successful outcome.
pub const SUCCESS_STATUS: u16 = 200;

/// Status used when a failure does not say otherwise.
pub const DEFAULT_FAILURE_STATUS: u16 = 500;

/// Outcome of a service operation.
///
/// Serializes as `{success, status_code, data}` or `{success, status_code, error}`.
/// "No payload" is `ServiceResult<()>`, whose `data` serializes as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResult<T> {
    /// Operation completed; carries its payload.
    Success(T),
    /// Operation failed.
    Failure {
        /// Human-readable reason
        message: String,
        /// HTTP-style status (404, 400, 500, ...)
        status_code: u16,
    },
}

/// The failure half of a [`ServiceResult`], as a standard error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {status_code})")]
pub struct ServiceFailure {
    pub message: String,
    pub status_code: u16,
}

impl<T> ServiceResult<T> {
    pub fn success(data: T) -> Self {
        ServiceResult::Success(data)
    }

    pub fn failure(message: impl Into<String>, status_code: u16) -> Self {
        ServiceResult::Failure {
            message: message.into(),
            status_code,
        }
    }

    /// Failure with the default 500 status.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::failure(message, DEFAULT_FAILURE_STATUS)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(message, 404)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::failure(message, 400)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ServiceResult::Success(_))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ServiceResult::Success(_) => SUCCESS_STATUS,
            ServiceResult::Failure { status_code, .. } => *status_code,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ServiceResult::Success(data) => Some(data),
            ServiceResult::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ServiceResult::Success(data) => Some(data),
            ServiceResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ServiceResult::Success(_) => None,
            ServiceResult::Failure { message, .. } => Some(message),
        }
    }

    /// Transform the payload, leaving failures untouched.
    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ServiceResult::Success(data) => ServiceResult::Success(f(data)),
            ServiceResult::Failure {
                message,
                status_code,
            } => ServiceResult::Failure {
                message,
                status_code,
            },
        }
    }

    /// Chain another operation; a failure short-circuits unchanged.
    pub fn and_then<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> ServiceResult<U>,
    {
        match self {
            ServiceResult::Success(data) => f(data),
            ServiceResult::Failure {
                message,
                status_code,
            } => ServiceResult::Failure {
                message,
                status_code,
            },
        }
    }

    pub fn into_result(self) -> Result<T, ServiceFailure> {
        match self {
            ServiceResult::Success(data) => Ok(data),
            ServiceResult::Failure {
                message,
                status_code,
            } => Err(ServiceFailure {
                message,
                status_code,
            }),
        }
    }
}

impl ServiceResult<()> {
    /// Success without a payload.
    pub fn ok() -> Self {
        ServiceResult::Success(())
    }
}

impl<T: Serialize> ServiceResult<T> {
    /// Transport-ready JSON mapping.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl<T: Serialize> Serialize for ServiceResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ServiceResult", 3)?;
        state.serialize_field("success", &self.is_success())?;
        state.serialize_field("status_code", &self.status_code())?;
        match self {
            ServiceResult::Success(data) => state.serialize_field("data", data)?,
            ServiceResult::Failure { message, .. } => state.serialize_field("error", message)?,
        }
        state.end()
    }
}
