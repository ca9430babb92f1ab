//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool (sessions), the identity backend, the content
//! store and the parsed site config. The identity backend and the content
//! store sit behind trait objects so handlers can be tested with mocks.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::content::ContentStore;
use crate::identity::{Identity, IdentityBackend};
use crate::session::{AdminEmail, SessionState};

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; every field is Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub identity: Arc<dyn IdentityBackend>,
    pub content: Arc<dyn ContentStore>,
    pub config: Arc<SiteConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(
        pool: PgPool,
        identity: Arc<dyn IdentityBackend>,
        content: Arc<dyn ContentStore>,
        config: SiteConfig,
    ) -> Self {
        Self { pool, identity, content, config: Arc::new(config) }
    }

    #[must_use]
    pub fn admin(&self) -> &AdminEmail {
        &self.config.admin_email
    }

    /// Server-side sessions are resolved before a request is handled, so
    /// the state is never `Initializing` here.
    #[must_use]
    pub fn session_state(&self, identity: Option<Identity>) -> SessionState {
        SessionState::resolved(identity, self.admin())
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
