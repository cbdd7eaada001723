//! In-memory stand-in for the URL analysis backend.
//!
//! Serves the four endpoints the client talks to with the same JSON shapes
//! and status codes as the real service. Users live in memory for the
//! lifetime of the router and passwords are compared in plain text. Issued
//! tokens are random and never checked.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

pub mod strength;

pub use strength::{check_password_strength, PasswordStrength, MAX_PASSWORD_LENGTH};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

const MAX_FULLNAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 255;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedUrl {
    pub original_url: String,
    pub scheme: Option<String>,
    pub netloc: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub query_string: Option<String>,
    pub query_params: Option<IndexMap<String, Vec<String>>>,
    pub fragment: Option<String>,
}

#[derive(Deserialize)]
pub struct UrlInput {
    pub url: String,
}

#[derive(Deserialize)]
pub struct RegisterInput {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct PasswordInput {
    pub password: String,
}

#[derive(Clone, Debug)]
struct User {
    fullname: String,
    password: String,
}

#[derive(Default)]
pub struct Store {
    users: HashMap<String, User>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiError = (StatusCode, Json<Value>);

pub const URL_RULES: [&str; 4] = [
    "Must start with http:// or https://",
    "Domain must be valid (no underscores)",
    "Domain must contain valid characters (a-z, 0-9, hyphen)",
    "Must have a valid TLD",
];

pub const URL_EXAMPLES: [&str; 3] = [
    "https://www.example.com",
    "https://api.github.com:443/repos/user/repo",
    "http://localhost:8000/api",
];

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/parse_url", post(parse_url))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/check_password_strength", post(password_strength))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Split `raw` into its components, or `None` if it fails validation.
pub fn decompose(raw: &str) -> Option<ParsedUrl> {
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return None;
    }
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;
    if host.contains('_') {
        return None;
    }

    let port = written_port(raw, &url);
    let netloc = match port {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let mut params: IndexMap<String, Vec<String>> = IndexMap::new();
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        params.entry(key.into_owned()).or_default().push(value.into_owned());
    }

    Some(ParsedUrl {
        original_url: raw.to_string(),
        scheme: Some(url.scheme().to_string()),
        netloc: Some(netloc),
        hostname: Some(host.to_string()),
        port,
        path: Some(url.path().to_string()).filter(|p| !p.is_empty()),
        query_string: url.query().filter(|q| !q.is_empty()).map(str::to_string),
        query_params: Some(params).filter(|p| !p.is_empty()),
        fragment: url.fragment().filter(|f| !f.is_empty()).map(str::to_string),
    })
}

/// The port as written in the authority. `Url::port` hides a port equal to
/// the scheme default, so `https://h:443` needs the raw text.
fn written_port(raw: &str, url: &Url) -> Option<u16> {
    if let Some(port) = url.port() {
        return Some(port);
    }
    let authority = raw.split_once("://")?.1.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit('@').next()?;
    let (_, digits) = host_port.rsplit_once(':')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    url.port_or_known_default()
}

fn detail(status: StatusCode, detail: Value) -> ApiError {
    (status, Json(json!({ "detail": detail })))
}

async fn parse_url(Json(input): Json<UrlInput>) -> Result<Json<ParsedUrl>, ApiError> {
    match decompose(&input.url) {
        Some(parsed) => {
            debug!(url = %input.url, "decomposed");
            Ok(Json(parsed))
        }
        None => Err(detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "message": "Invalid URL format",
                "error": "URL must follow these rules:",
                "rules": URL_RULES,
                "examples": URL_EXAMPLES,
            }),
        )),
    }
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<Value>, ApiError> {
    let length = input.password.chars().count();
    if length > MAX_PASSWORD_LENGTH {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            json!({
                "message": "Password too long",
                "error": format!("Password must be less than {MAX_PASSWORD_LENGTH} characters"),
                "current_length": length,
            }),
        ));
    }
    if !looks_like_email(&input.email) {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            json!({
                "message": "Invalid email format",
                "error": "Please provide a valid email address",
                "examples": ["user@example.com", "firstname.lastname@company.com"],
            }),
        ));
    }
    let mut store = db.write().await;
    if store.users.contains_key(&input.email) {
        return Err(detail(StatusCode::BAD_REQUEST, json!("Email already registered")));
    }

    let strength = check_password_strength(&input.password);
    if strength.strength == "invalid" {
        let reason = strength.suggestions.into_iter().next().unwrap_or_default();
        return Err(detail(
            StatusCode::BAD_REQUEST,
            json!({ "message": "Invalid password", "error": reason }),
        ));
    }
    if strength.score < 3 {
        debug!(email = %input.email, score = strength.score, "weak password rejected");
        return Err(detail(
            StatusCode::BAD_REQUEST,
            json!({
                "message": "Password not strong enough",
                "strength": strength.strength,
                "suggestions": strength.suggestions,
            }),
        ));
    }

    let email = strip_markup(&input.email);
    let fullname = strip_markup(&input.fullname);
    if fullname.chars().count() > MAX_FULLNAME_LENGTH || email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(detail(StatusCode::BAD_REQUEST, json!("Input length exceeds maximum allowed")));
    }

    store.users.insert(
        email.clone(),
        User {
            fullname,
            password: input.password,
        },
    );
    info!(email = %email, "user registered");
    Ok(Json(json!({ "message": "User created successfully" })))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Value>, ApiError> {
    let store = db.read().await;
    let user = store
        .users
        .get(&input.email)
        .filter(|user| user.password == input.password)
        .cloned()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, json!("Incorrect email or password")))?;
    let token = Uuid::new_v4().to_string();
    info!(email = %input.email, fullname = %user.fullname, "login succeeded");
    Ok(Json(json!({ "access_token": token, "token_type": "bearer" })))
}

async fn password_strength(Json(input): Json<PasswordInput>) -> Json<PasswordStrength> {
    Json(check_password_strength(&input.password))
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    local.len() <= 64 && domain.len() <= 255 && EMAIL.is_match(email)
}

fn strip_markup(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, ';' | '<' | '>' | '&')).collect()
}
