//! Auth/session state for one visitor.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionState` is the read-only view consumed by the route guard and by
//! identity-aware pages. `SessionContext` owns the state machine and applies
//! guard verdicts; `scope` provisions a read handle to code running inside a
//! session.
//!
//! DESIGN
//! ======
//! `is_admin` is derived from the identity every time a state is built and
//! has no setter, so it cannot drift from the identity it describes.

pub mod context;
pub mod scope;

use serde::Serialize;

use crate::identity::Identity;

pub use context::{Navigator, SessionContext};
pub use scope::{ContextError, SessionHandle, expect_session, provide_session, provide_session_sync, use_session};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// The configured administrator address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminEmail(String);

impl AdminEmail {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into().trim().to_ascii_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `identity` is present and carries this email, ignoring
    /// ASCII case.
    #[must_use]
    pub fn matches(&self, identity: Option<&Identity>) -> bool {
        identity
            .and_then(|i| i.email.as_deref())
            .is_some_and(|email| email.trim().eq_ignore_ascii_case(&self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    Initializing,
    ResolvedAnonymous,
    ResolvedAuthenticated,
}

/// Current identity, loading flag and derived admin flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    identity: Option<Identity>,
    loading_auth: bool,
    is_admin: bool,
}

impl SessionState {
    /// State before the first auth emission arrives.
    #[must_use]
    pub fn initializing() -> Self {
        Self { identity: None, loading_auth: true, is_admin: false }
    }

    /// State after an auth emission carrying `identity`.
    #[must_use]
    pub fn resolved(identity: Option<Identity>, admin: &AdminEmail) -> Self {
        let is_admin = admin.matches(identity.as_ref());
        Self { identity, loading_auth: false, is_admin }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn loading_auth(&self) -> bool {
        self.loading_auth
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        match (self.loading_auth, &self.identity) {
            (true, _) => AuthPhase::Initializing,
            (false, None) => AuthPhase::ResolvedAnonymous,
            (false, Some(_)) => AuthPhase::ResolvedAuthenticated,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initializing()
    }
}
