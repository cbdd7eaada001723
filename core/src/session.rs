//! Credential token access.
//!
//! The route guard and the login form never touch storage directly; they are
//! handed a `SessionAccessor` / `TokenStore`, so tests can substitute an
//! in-memory store and hosts can persist wherever suits them.

use std::cell::RefCell;

/// Key the credential token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Read-only view of the current session.
pub trait SessionAccessor {
    /// The stored credential token, if any. Presence alone means "signed in";
    /// there is no expiry check.
    fn token(&self) -> Option<String>;

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// Writable session storage.
pub trait TokenStore: SessionAccessor {
    type Error: std::error::Error + Send + Sync + 'static;

    fn store(&self, token: &str) -> Result<(), Self::Error>;

    fn clear(&self) -> Result<(), Self::Error>;
}

impl<T: SessionAccessor + ?Sized> SessionAccessor for &T {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl SessionAccessor for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    type Error = std::convert::Infallible;

    fn store(&self, token: &str) -> Result<(), Self::Error> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        self.token.borrow_mut().take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert!(!store.is_authenticated());
        store.store("fake-token").unwrap();
        assert_eq!(store.token().as_deref(), Some("fake-token"));
        store.clear().unwrap();
        assert!(store.token().is_none());
    }

    #[test]
    fn reference_is_an_accessor() {
        fn read(accessor: impl SessionAccessor) -> Option<String> {
            accessor.token()
        }
        let store = MemoryTokenStore::with_token("t");
        assert_eq!(read(&store).as_deref(), Some("t"));
    }
}
