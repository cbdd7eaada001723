//! Stateless HTTP request builder and response parser for the URL analysis API.
//!
//! # Design
//! `ApiClient` holds the base URL, the decomposition path and an optional
//! bearer token. It carries no mutable state between calls. Each operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes the host's `Outcome`. No retry, pooling or
//! timeout lives here; each call maps to exactly one round-trip.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{ApiError, DecomposeFailure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Outcome};
use crate::types::{
    DecomposeRequest, LoginRequest, MessageResponse, PasswordStrength, PasswordStrengthRequest,
    RegisterRequest, TokenResponse, UrlDecomposition,
};

pub const DEFAULT_DECOMPOSE_PATH: &str = "/parse_url";

/// Synchronous, stateless client for the URL analysis API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    decompose_path: String,
    bearer: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            decompose_path: DEFAULT_DECOMPOSE_PATH.to_string(),
            bearer: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.api_base_url).with_decompose_path(&config.decompose_path)
    }

    pub fn with_decompose_path(mut self, path: &str) -> Self {
        let trimmed = path.trim_matches('/');
        self.decompose_path = format!("/{trimmed}");
        self
    }

    /// Attach `authorization: Bearer <token>` to every request built afterwards.
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_decompose(&self, url: &str) -> Result<HttpRequest, ApiError> {
        let payload = DecomposeRequest {
            url: url.to_string(),
        };
        self.post_json(&self.decompose_path, &payload)
    }

    /// Interpret the outcome of a decomposition request.
    ///
    /// Ok bodies are decoded field by field; missing or mistyped fields show
    /// up as placeholders at render time. Only a body that is not a JSON
    /// object is treated as an unexpected response.
    pub fn parse_decompose(&self, outcome: Outcome) -> Result<UrlDecomposition, DecomposeFailure> {
        let response = outcome.map_err(|err| {
            debug!(error = %err, "decompose request rejected");
            DecomposeFailure::from(err)
        })?;

        if !response.is_success() {
            let failure = DecomposeFailure::from_error_response(&response);
            debug!(
                status = response.status,
                validation = failure.is_validation(),
                "decompose failed"
            );
            return Err(failure);
        }

        UrlDecomposition::from_json_object(&response.body).map_err(|e| {
            warn!(status = response.status, error = %e, "decompose response is not an object");
            DecomposeFailure::UnexpectedResponse {
                status: response.status,
            }
        })
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.post_json("/login", input)
    }

    pub fn parse_login(&self, outcome: Outcome) -> Result<TokenResponse, ApiError> {
        parse_json(outcome?, 200)
    }

    pub fn build_register(&self, input: &RegisterRequest) -> Result<HttpRequest, ApiError> {
        self.post_json("/register", input)
    }

    pub fn parse_register(&self, outcome: Outcome) -> Result<MessageResponse, ApiError> {
        parse_json(outcome?, 200)
    }

    pub fn build_password_strength(&self, password: &str) -> Result<HttpRequest, ApiError> {
        let payload = PasswordStrengthRequest {
            password: password.to_string(),
        };
        self.post_json("/check_password_strength", &payload)
    }

    pub fn parse_password_strength(&self, outcome: Outcome) -> Result<PasswordStrength, ApiError> {
        parse_json(outcome?, 200)
    }

    fn post_json<T: Serialize>(&self, path: &str, payload: &T) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if let Some(token) = &self.bearer {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{path}", self.base_url),
            headers,
            body: Some(body),
        };
        debug!(method = %request.method, url = %request.url, "built request");
        Ok(request)
    }
}

/// Map non-success status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
