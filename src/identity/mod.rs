//! Identity provider adapter.
//!
//! ARCHITECTURE
//! ============
//! `IdentityBackend` is the stateless boundary to the external identity
//! service (sign-in, sign-up, sign-out calls). `HostedIdentityProvider`
//! layers an `AuthHub` on top of a backend and implements
//! `IdentityProvider`: the session-scoped adapter a `SessionContext`
//! subscribes to. The server talks to the backend directly because it keeps
//! its own cookie sessions.

pub mod hub;
pub mod provider;
pub mod toolkit;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use hub::{AuthHub, AuthStream, Unsubscribe};
pub use provider::HostedIdentityProvider;
pub use toolkit::IdentityToolkit;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

// =============================================================================
// TYPES
// =============================================================================

/// Snapshot of an authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Identifier assigned by the identity service.
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Email/password pair submitted by the sign-in form.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Reject submissions the identity service would refuse anyway.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` for a blank email or password.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// New-account submission from the sign-up form.
#[derive(Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Registration {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into(), display_name: None }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidEmail` for a malformed address and `WeakCredential`
    /// for an empty password. Strength rules beyond that belong to the
    /// identity service.
    pub fn validate(&self) -> Result<(), AuthError> {
        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'));
        if !valid_email {
            return Err(AuthError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(AuthError::WeakCredential);
        }
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("display_name", &self.display_name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already in use")]
    EmailInUse,
    #[error("password too weak")]
    WeakCredential,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("identity service unreachable: {0}")]
    NetworkFailure(String),
    #[error("identity service error: {0}")]
    Provider(String),
}

// =============================================================================
// TRAITS
// =============================================================================

/// Stateless calls to the external identity service.
#[async_trait::async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError>;

    async fn sign_up(&self, registration: &Registration) -> Result<Identity, AuthError>;

    /// Revoke whatever the service holds for `identity`. Services whose
    /// sign-out is purely client-side keep the default.
    async fn sign_out(&self, identity: &Identity) -> Result<(), AuthError> {
        let _ = identity;
        Ok(())
    }
}

/// Session-scoped identity adapter with push-based auth-state notifications.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Subscribe to auth-state changes. The stream yields the current
    /// identity (or `None`) immediately, then every later transition, until
    /// the returned `Unsubscribe` is cancelled.
    fn subscribe(&self) -> (AuthStream, Unsubscribe);

    /// On success a later emission carries the new identity.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError>;

    /// On success a later emission carries the new identity.
    async fn sign_up(&self, registration: &Registration) -> Result<Identity, AuthError>;

    /// On success a later emission carries `None`.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
