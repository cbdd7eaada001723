//! Credential token persisted as a small JSON key-value file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;
use urlscope_core::{SessionAccessor, TokenStore, TOKEN_KEY};

use crate::settings;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("session file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Key-value session file, e.g. `{"token": "..."}`. There is no expiry.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.local/state/urlscope/session.json`
    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(settings::base_dirs()?.get_state_home().join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, text).map_err(io_err)
    }
}

impl SessionAccessor for FileTokenStore {
    fn token(&self) -> Option<String> {
        match self.read() {
            Ok(entries) => entries.get(TOKEN_KEY)?.as_str().map(str::to_string),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable session file");
                None
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    type Error = StoreError;

    fn store(&self, token: &str) -> Result<(), StoreError> {
        // Other keys in the file are preserved; a corrupt file is replaced.
        let mut entries = self.read().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write(&entries)
    }

    fn clear(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut entries = self.read().unwrap_or_default();
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FileTokenStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("state/session.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_means_signed_out() {
        let (_dir, store) = store();
        assert!(store.token().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn store_then_read_back() {
        let (_dir, store) = store();
        store.store("fake-token").unwrap();
        assert_eq!(store.token().as_deref(), Some("fake-token"));
        let raw = fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["token"], "fake-token");
    }

    #[test]
    fn clear_removes_only_the_token() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"token":"t","theme":"dark"}"#).unwrap();
        store.clear().unwrap();
        assert!(store.token().is_none());
        let raw = fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["theme"], "dark");
    }

    #[test]
    fn clear_without_file_is_a_no_op() {
        let (_dir, store) = store();
        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_reads_as_signed_out_and_is_replaced() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();
        assert!(store.token().is_none());
        store.store("fresh").unwrap();
        assert_eq!(store.token().as_deref(), Some("fresh"));
    }
}
