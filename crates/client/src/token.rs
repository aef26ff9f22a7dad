//! Ambient bearer-token slot shared between the auth store and the HTTP client.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;

/// Last-write-wins slot holding the current bearer token.
///
/// Written by the auth store on login/rehydrate/logout and by the API client
/// when the backend answers 401; read by every request's header-attachment
/// step. Writes only occur on those explicit paths, so no ordering beyond
/// last-write-wins is needed.
#[derive(Clone, Default)]
pub struct TokenSlot {
    inner: Arc<RwLock<Option<SecretString>>>,
}

impl TokenSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current token.
    pub fn set(&self, token: SecretString) {
        *self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Remove the current token.
    pub fn clear(&self) {
        *self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Get a copy of the current token, if any.
    #[must_use]
    pub fn get(&self) -> Option<SecretString> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a token is currently present.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
