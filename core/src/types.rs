//! Domain DTOs for the URL analysis API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined independently
//! of the mock-server crate; integration tests catch schema drift.
//! `UrlDecomposition` is lenient: every field may be absent, null or of the
//! wrong type. Such a field decodes as `None` instead of failing the whole
//! body, and the renderer turns it into a placeholder.

use std::fmt;

use indexmap::IndexMap;
use serde::de::value::MapAccessDeserializer;
use serde::de::{DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Query parameters as returned by the server, in server order.
pub type QueryParams = IndexMap<String, Vec<String>>;

/// Structured breakdown of a URL produced by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UrlDecomposition {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub original_url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub scheme: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub netloc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub hostname: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub port: Option<u16>,
    #[serde(deserialize_with = "lenient")]
    pub path: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub query_string: Option<String>,
    #[serde(deserialize_with = "lenient_query_params")]
    pub query_params: Option<QueryParams>,
    #[serde(deserialize_with = "lenient")]
    pub fragment: Option<String>,
}

impl UrlDecomposition {
    /// Decode a response body that must be a JSON object. Arrays, scalars and
    /// non-JSON text are errors; mistyped fields inside the object are not.
    pub fn from_json_object(body: &str) -> serde_json::Result<Self> {
        let mut de = serde_json::Deserializer::from_str(body);
        let parsed = (&mut de).deserialize_map(ObjectOnly)?;
        de.end()?;
        Ok(parsed)
    }
}

struct ObjectOnly;

impl<'de> Visitor<'de> for ObjectOnly {
    type Value = UrlDecomposition;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a URL decomposition object")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        UrlDecomposition::deserialize(MapAccessDeserializer::new(map))
    }
}

/// Decode a field as `T`, or `None` when it is null or mistyped.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Values of one query parameter: a list of strings, or a bare string taken as
/// a single value. Non-string list items are dropped; anything else drops the
/// key.
struct ParamValues(Option<Vec<String>>);

impl<'de> Deserialize<'de> for ParamValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = match Value::deserialize(deserializer)? {
            Value::String(s) => Some(vec![s]),
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        };
        Ok(ParamValues(values))
    }
}

/// Buffered by serde, so a map keeps the server's key order.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQueryParams {
    Map(IndexMap<String, ParamValues>),
    Other(IgnoredAny),
}

fn lenient_query_params<'de, D>(deserializer: D) -> Result<Option<QueryParams>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawQueryParams::deserialize(deserializer)? {
        RawQueryParams::Map(map) => Ok(Some(
            map.into_iter()
                .filter_map(|(key, ParamValues(values))| Some((key, values?)))
                .collect(),
        )),
        RawQueryParams::Other(_) => Ok(None),
    }
}

/// Request payload for `POST /parse_url`. The URL is sent exactly as typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecomposeRequest {
    pub url: String,
}

/// Structured validation error carried under `detail` in a failure body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrorDetail {
    pub message: String,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Request payload for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response. `access_token` becomes the credential token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Request payload for `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Request payload for `POST /check_password_strength`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordStrengthRequest {
    pub password: String,
}

/// Password analysis returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordStrength {
    pub password: String,
    pub strength: String,
    pub score: u8,
    #[serde(default)]
    pub suggestions: Vec<String>,
}
