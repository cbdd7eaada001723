//! Sign-in and registration form controllers.
//!
//! Same shape as the decompose form: `submit` builds a request, the host
//! executes it, `resolve` applies the outcome. Failures are turned into an
//! inline message; they never escape as errors.

use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::guard::{Navigation, Route};
use crate::http::{HttpRequest, Outcome};
use crate::session::TokenStore;
use crate::types::{LoginRequest, RegisterRequest};

pub const LOGIN_FAILED_MESSAGE: &str = "Unable to sign in. Please try again.";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Please try again.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";
pub const REGISTER_SUCCESS_MESSAGE: &str = "Account created. You can now sign in.";

/// Prefer the server's `detail` text, fall back to a fixed message.
fn inline_error(err: &ApiError, fallback: &str) -> String {
    err.detail_message().unwrap_or_else(|| fallback.to_string())
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    client: ApiClient,
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl LoginForm {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            email: String::new(),
            password: String::new(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submit(&mut self) -> Result<HttpRequest, ApiError> {
        self.error = None;
        self.client.build_login(&LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }

    /// On success the token is written to `store` and the caller is sent to
    /// the authenticated landing route. On failure the store is untouched.
    pub fn resolve<S: TokenStore>(&mut self, outcome: Outcome, store: &S) -> Navigation {
        let token = match self.client.parse_login(outcome) {
            Ok(token) => token,
            Err(err) => {
                debug!(error = %err, "sign-in failed");
                self.error = Some(inline_error(&err, LOGIN_FAILED_MESSAGE));
                return Navigation::Proceed;
            }
        };
        if let Err(err) = store.store(&token.access_token) {
            warn!(error = %err, "could not persist credential token");
            self.error = Some(LOGIN_FAILED_MESSAGE.to_string());
            return Navigation::Proceed;
        }
        info!(email = %self.email, "signed in");
        Navigation::Redirect(Route::AUTHENTICATED_LANDING)
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    client: ApiClient,
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    error: Option<String>,
    success: Option<String>,
}

impl RegisterForm {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            fullname: String::new(),
            email: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            error: None,
            success: None,
        }
    }

    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirmation
    }

    /// Inline hint shown under the confirmation field.
    pub fn confirmation_error(&self) -> Option<&'static str> {
        (!self.password_confirmation.is_empty() && !self.passwords_match())
            .then_some(PASSWORD_MISMATCH_MESSAGE)
    }

    /// The submit button is disabled until every field is filled and the
    /// confirmation matches.
    pub fn can_submit(&self) -> bool {
        !self.fullname.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.password.is_empty()
            && self.passwords_match()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// `None` while the form is not submittable.
    pub fn submit(&mut self) -> Result<Option<HttpRequest>, ApiError> {
        self.error = None;
        self.success = None;
        if !self.can_submit() {
            return Ok(None);
        }
        self.client
            .build_register(&RegisterRequest {
                fullname: self.fullname.clone(),
                email: self.email.clone(),
                password: self.password.clone(),
            })
            .map(Some)
    }

    pub fn resolve(&mut self, outcome: Outcome) -> Navigation {
        match self.client.parse_register(outcome) {
            Ok(_) => {
                info!(email = %self.email, "account registered");
                self.success = Some(REGISTER_SUCCESS_MESSAGE.to_string());
                Navigation::Redirect(Route::Login)
            }
            Err(err) => {
                debug!(error = %err, "registration failed");
                self.error = Some(inline_error(&err, REGISTER_FAILED_MESSAGE));
                Navigation::Proceed
            }
        }
    }
}
