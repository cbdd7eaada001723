//! Error types for the URL analysis API client.
//!
//! # Design
//! Two families. `ApiError` is the conventional client error used by the
//! login, register and password-strength operations. `DecomposeFailure` is
//! the display-oriented failure of a URL decomposition: it is never thrown
//! past the form controller, only rendered.
//!
//! Failure bodies are decoded by explicit shape validation rather than
//! probing for fields at render time. A body counts as a structured
//! validation error only when `detail` is an object with a string `message`
//! and, if present, string arrays for `rules` and `examples`. Everything else
//! falls back to `UnexpectedResponse`.

use serde_json::Value;
use thiserror::Error;

use crate::http::{HttpResponse, TransportError};
use crate::types::ValidationErrorDetail;

/// Shown when the server answered with something we could not interpret.
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "The server returned an unexpected response";

/// Shown when the request never produced a response.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Could not reach the URL analysis service";

/// Errors returned by `ApiClient` build and parse methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned a status other than the expected one.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ApiError {
    /// Human-readable `detail` carried by a FastAPI-style error body, either
    /// `{"detail": "..."}` or `{"detail": {"message": "..."}}`.
    pub fn detail_message(&self) -> Option<String> {
        let ApiError::Http { body, .. } = self else {
            return None;
        };
        let value: Value = serde_json::from_str(body).ok()?;
        match value.get("detail")? {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get("message")?.as_str().map(str::to_string),
            _ => None,
        }
    }
}

/// Why a decomposition submission did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecomposeFailure {
    /// Non-ok response with a recognized `detail` payload.
    #[error("{}", .0.message)]
    Validation(ValidationErrorDetail),

    /// The server answered, but not with anything we could interpret.
    #[error("{msg} (HTTP {status})", msg = UNEXPECTED_RESPONSE_MESSAGE)]
    UnexpectedResponse { status: u16 },

    /// The request was rejected before a response arrived.
    #[error("{msg}: {0}", msg = TRANSPORT_FAILURE_MESSAGE)]
    Transport(String),
}

impl DecomposeFailure {
    /// Classify a non-ok response body.
    pub fn from_error_response(response: &HttpResponse) -> Self {
        match decode_validation_detail(&response.body) {
            Some(detail) => DecomposeFailure::Validation(detail),
            None => DecomposeFailure::UnexpectedResponse {
                status: response.status,
            },
        }
    }

    /// The fixed user-facing message for generic failures, or the server's
    /// message for validation failures.
    pub fn message(&self) -> &str {
        match self {
            DecomposeFailure::Validation(detail) => &detail.message,
            DecomposeFailure::UnexpectedResponse { .. } => UNEXPECTED_RESPONSE_MESSAGE,
            DecomposeFailure::Transport(_) => TRANSPORT_FAILURE_MESSAGE,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DecomposeFailure::Validation(_))
    }
}

impl From<TransportError> for DecomposeFailure {
    fn from(err: TransportError) -> Self {
        DecomposeFailure::Transport(err.message)
    }
}

/// Extract `detail.{message, rules, examples}` from a failure body.
fn decode_validation_detail(body: &str) -> Option<ValidationErrorDetail> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail")?.as_object()?;
    let message = detail.get("message")?.as_str()?.to_string();
    let rules = string_list(detail.get("rules"))?;
    let examples = string_list(detail.get("examples"))?;
    Some(ValidationErrorDetail {
        message,
        rules,
        examples,
    })
}

/// Absent or null means empty; present means "array of strings" or reject.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(_) => None,
    }
}
