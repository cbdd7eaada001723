//! IO-free client core for the urlscope URL analysis service.
//!
//! # Overview
//! Builds `HttpRequest` values and interprets their outcomes without touching
//! the network (host-does-IO pattern). Hosts execute the round-trip, persist
//! the credential token and draw the views; everything with branching logic
//! lives here and is deterministic.
//!
//! # Design
//! - `ApiClient` is stateless: base URL, decomposition path, optional bearer.
//! - `DecomposeForm`, `LoginForm` and `RegisterForm` own their form state and
//!   convert every failure into display state.
//! - `render` projects results and failures onto plain view models.
//! - `RouteGuard` reads the session through an injected `SessionAccessor`.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod forms;
pub mod guard;
pub mod http;
pub mod render;
pub mod session;
pub mod types;

pub use client::ApiClient;
pub use config::AppConfig;
pub use controller::{DecomposeForm, Resolution, Submission, SubmissionState};
pub use error::{ApiError, DecomposeFailure};
pub use forms::{LoginForm, RegisterForm};
pub use guard::{Navigation, Route, RouteGuard};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Outcome, TransportError};
pub use render::{ErrorView, ResultRow, View};
pub use session::{MemoryTokenStore, SessionAccessor, TokenStore, TOKEN_KEY};
pub use types::{
    DecomposeRequest, LoginRequest, MessageResponse, PasswordStrength, RegisterRequest,
    TokenResponse, UrlDecomposition, ValidationErrorDetail,
};
