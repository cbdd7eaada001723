//! Application configuration shared by every host.
//!
//! The core only knows the shape and the defaults; locating and writing the
//! file on disk is the host's job.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_DECOMPOSE_PATH;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the analysis API, without a trailing slash.
    pub api_base_url: String,
    /// Path of the decomposition endpoint under `api_base_url`.
    pub decompose_path: String,
    /// Where the credential token is persisted. `None` uses the host default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            decompose_path: DEFAULT_DECOMPOSE_PATH.to_string(),
            token_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
