use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use tracing::{debug, info, warn};

use super::storage::KeyValueStore;

/// Persisted key holding the bearer token
pub const TOKEN_KEY: &str = "run_ai_auth_token";

/// Persisted key holding the account email
pub const EMAIL_KEY: &str = "run_ai_user_email";

/// Bearer token plus the identity it was issued for.
/// The two halves only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    identity: String,
}

impl Credential {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// Single source of truth for "is anyone logged in, and as whom".
///
/// Clone is cheap and every clone observes the same session. The in-memory
/// credential and the persisted record are updated under one write lock, so
/// readers never see a token without its identity.
#[derive(Clone)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Credential>>>,
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Resume whatever session the backend holds. No network call.
    pub fn initialize(backend: Arc<dyn KeyValueStore>) -> Self {
        let token = Self::read_key(backend.as_ref(), TOKEN_KEY);
        let identity = Self::read_key(backend.as_ref(), EMAIL_KEY);

        let current = match (token, identity) {
            (Some(token), Some(identity)) => {
                debug!(%identity, "Resumed persisted session");
                Some(Credential { token, identity })
            }
            (None, None) => {
                debug!("No persisted session");
                None
            }
            (token, _) => {
                // Half a record is not a session; drop the stray key so the
                // persisted state is back to all-or-nothing
                warn!(
                    has_token = token.is_some(),
                    "Incomplete persisted session, starting logged out"
                );
                Self::remove_keys(backend.as_ref());
                None
            }
        };

        Self {
            current: Arc::new(RwLock::new(current)),
            backend,
        }
    }

    /// Record a freshly issued credential in memory and in the backend.
    pub fn set_session(&self, token: &str, identity: &str) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = self.backend.set(TOKEN_KEY, token) {
            warn!(error = %e, "Failed to persist session token");
        }
        if let Err(e) = self.backend.set(EMAIL_KEY, identity) {
            warn!(error = %e, "Failed to persist session identity");
        }

        *current = Some(Credential {
            token: token.to_string(),
            identity: identity.to_string(),
        });
        info!(%identity, "Session started");
    }

    /// Forget the credential. Safe to call when already logged out.
    pub fn clear_session(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        Self::remove_keys(self.backend.as_ref());
        if let Some(previous) = current.take() {
            info!(identity = %previous.identity, "Session cleared");
        }
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|c| c.token.clone())
    }

    pub fn identity(&self) -> Option<String> {
        self.read().as_ref().map(|c| c.identity.clone())
    }

    /// Snapshot of the whole credential, read under one lock
    pub fn credential(&self) -> Option<Credential> {
        self.read().clone()
    }

    pub fn is_active(&self) -> bool {
        self.read().is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.is_active() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Credential>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_key(backend: &dyn KeyValueStore, key: &str) -> Option<String> {
        match backend.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Failed to read persisted session key");
                None
            }
        }
    }

    fn remove_keys(backend: &dyn KeyValueStore) {
        for key in [TOKEN_KEY, EMAIL_KEY] {
            if let Err(e) = backend.remove(key) {
                warn!(key, error = %e, "Failed to remove persisted session key");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
