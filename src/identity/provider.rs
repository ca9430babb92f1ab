//! Session-scoped identity provider.
//!
//! Failed operations never publish, so a rejected sign-in leaves every
//! subscriber's view of the session untouched.

use tracing::{info, warn};

use super::hub::{AuthHub, AuthStream, Unsubscribe};
use super::{AuthError, Credentials, Identity, IdentityBackend, IdentityProvider, Registration};

pub struct HostedIdentityProvider<B> {
    backend: B,
    hub: AuthHub,
}

impl<B: IdentityBackend> HostedIdentityProvider<B> {
    /// Provider for a session that starts signed out.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::restored(backend, None)
    }

    /// Provider for a session whose identity was already known, e.g. restored
    /// from a server session cookie.
    #[must_use]
    pub fn restored(backend: B, identity: Option<Identity>) -> Self {
        Self { backend, hub: AuthHub::new(identity) }
    }

    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.hub.current()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait::async_trait]
impl<B: IdentityBackend> IdentityProvider for HostedIdentityProvider<B> {
    fn subscribe(&self) -> (AuthStream, Unsubscribe) {
        self.hub.subscribe()
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        credentials.validate()?;
        let identity = self.backend.sign_in(credentials).await.inspect_err(|e| {
            warn!(error = %e, "sign-in rejected");
        })?;
        info!(uid = %identity.uid, "signed in");
        self.hub.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, registration: &Registration) -> Result<Identity, AuthError> {
        registration.validate()?;
        let identity = self.backend.sign_up(registration).await.inspect_err(|e| {
            warn!(error = %e, "sign-up rejected");
        })?;
        info!(uid = %identity.uid, "account created");
        self.hub.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(identity) = self.hub.current() {
            self.backend.sign_out(&identity).await?;
            info!(uid = %identity.uid, "signed out");
        }
        self.hub.publish(None);
        Ok(())
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
