//! Session storage
//!
//! Holds the bearer token handed back by the backend after OTP verification.
//! Shared across every resource client; all authenticated requests read the
//! token from here.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::types::AuthUser;

/// An authenticated session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// Shared, mutable holder for the current session
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session, if signed in
    pub fn get(&self) -> Option<Session> {
        self.inner.read().unwrap().clone()
    }

    /// Replace the current session
    pub fn set(&self, session: Session) {
        let mut inner = self.inner.write().unwrap();
        *inner = Some(session);
    }

    /// Drop the current session
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        *inner = None;
    }

    /// The bearer token of the current session, if any
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .as_ref()
            .map(|session| session.access_token.clone())
    }
}
