use crate::store::{MemoryStore, SessionStore};
use crate::types::AccessToken;
use crate::{RecommenderError, Result};
use std::sync::Arc;

/// Key holding the email registered with the backend.
pub const CURRENT_USER_KEY: &str = "CurrentUser";
/// Key holding the PKCE verifier while a redirect is in flight.
pub const VERIFIER_KEY: &str = "spotify-sdk:verifier";
/// Key holding the music-service access token.
pub const TOKEN_KEY: &str = "spotify-sdk:AuthorizationCodeWithPKCEStrategy:token";

/// The screen the app should land on, given the stored session facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// No backend account yet: ask for the email to register
    Registration,
    /// Registered with the backend but not authorized with the music service
    ExternalLogin,
    /// Both facts present
    Recommendations,
}

/// Session facts recorded on top of a [`SessionStore`].
///
/// The two facts, "has a backend account" and "has music-service auth", are
/// independent and each can be queried or cleared on its own. Cloning a
/// `Session` shares the underlying store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("backend_account", &self.has_backend_account())
            .field("service_auth", &self.has_service_auth())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// A session backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn has_backend_account(&self) -> bool {
        self.store.get(CURRENT_USER_KEY).is_some()
    }

    /// The email registered with the backend, if any.
    pub fn backend_account(&self) -> Option<String> {
        self.store.get(CURRENT_USER_KEY)
    }

    pub fn record_backend_account(&self, email: &str) -> Result<()> {
        self.store.set(CURRENT_USER_KEY, email)
    }

    pub fn forget_backend_account(&self) -> Result<()> {
        self.store.remove(CURRENT_USER_KEY)
    }

    /// Whether the music-service token is stored.
    ///
    /// This only checks presence; an expired token still counts, the
    /// authorization flow decides whether to refresh it.
    pub fn has_service_auth(&self) -> bool {
        self.store.get(TOKEN_KEY).is_some()
    }

    /// The stored music-service token.
    ///
    /// A token that no longer parses is treated as absent.
    pub fn service_token(&self) -> Option<AccessToken> {
        let json = self.store.get(TOKEN_KEY)?;
        match AccessToken::from_json(&json) {
            Ok(token) => Some(token),
            Err(e) => {
                log::warn!("Stored music-service token is unreadable: {e}");
                None
            }
        }
    }

    pub fn store_service_token(&self, token: &AccessToken) -> Result<()> {
        let json = token
            .to_json()
            .map_err(|e| RecommenderError::Storage(format!("Failed to serialize token: {e}")))?;
        self.store.set(TOKEN_KEY, &json)
    }

    pub fn pending_verifier(&self) -> Option<String> {
        self.store.get(VERIFIER_KEY)
    }

    pub fn store_verifier(&self, verifier: &str) -> Result<()> {
        self.store.set(VERIFIER_KEY, verifier)
    }

    pub fn clear_verifier(&self) -> Result<()> {
        self.store.remove(VERIFIER_KEY)
    }

    /// Drop the music-service token and any pending verifier.
    pub fn forget_service_auth(&self) -> Result<()> {
        self.store.remove(VERIFIER_KEY)?;
        self.store.remove(TOKEN_KEY)
    }

    /// Both facts present.
    pub fn is_fully_authenticated(&self) -> bool {
        self.has_backend_account() && self.has_service_auth()
    }

    /// Clear both the backend account and the music-service auth.
    ///
    /// Idempotent: logging out of an empty session succeeds. Every fact is
    /// removed even when an earlier removal fails; the first failure is
    /// returned.
    pub fn logout(&self) -> Result<()> {
        let account = self.forget_backend_account();
        let service = self.forget_service_auth();
        account.and(service)?;
        log::debug!("Session cleared");
        Ok(())
    }

    pub fn route(&self) -> Route {
        match (self.has_backend_account(), self.has_service_auth()) {
            (true, true) => Route::Recommendations,
            (true, false) => Route::ExternalLogin,
            (false, _) => Route::Registration,
        }
    }
}
