//! Session state machine and guard enforcement.
//!
//! ```text
//! Initializing ──emission(None)──▶ ResolvedAnonymous
//!      │                                ▲ │
//!      └──emission(Some)──▶ ResolvedAuthenticated
//! ```
//!
//! Every emission rebuilds the state from the identity it carries and
//! re-runs the route guard against the current path on the same call, before
//! the next emission can be processed. Redirect verdicts go to the
//! `Navigator`, and the redirect target becomes the current path.

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tracing::{debug, info};

use super::scope::SessionHandle;
use super::{AdminEmail, SessionState};
use crate::guard::{self, Verdict};
use crate::identity::Identity;

/// Client-side navigation boundary.
pub trait Navigator: Send + Sync {
    fn redirect(&self, target: &str);
}

pub struct SessionContext<N> {
    admin: AdminEmail,
    path: String,
    state: watch::Sender<SessionState>,
    navigator: N,
}

impl<N: Navigator> SessionContext<N> {
    #[must_use]
    pub fn new(admin: AdminEmail, path: impl Into<String>, navigator: N) -> Self {
        let (state, _) = watch::channel(SessionState::initializing());
        Self { admin, path: path.into(), state, navigator }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Read-only view for consumers; see `scope::provide_session`.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.state.subscribe())
    }

    /// Apply one auth emission and enforce the guard.
    pub fn apply(&mut self, emission: Option<Identity>) -> Verdict {
        let next = SessionState::resolved(emission, &self.admin);
        debug!(phase = ?next.phase(), admin = next.is_admin(), "auth state resolved");
        self.state.send_replace(next);
        self.enforce()
    }

    /// Record a navigation to `path` and enforce the guard.
    pub fn navigate(&mut self, path: impl Into<String>) -> Verdict {
        self.path = path.into();
        self.enforce()
    }

    /// Process emissions serially until the stream ends.
    pub async fn run<S>(&mut self, mut emissions: S)
    where
        S: Stream<Item = Option<Identity>> + Unpin,
    {
        while let Some(emission) = emissions.next().await {
            self.apply(emission);
        }
        debug!("auth stream ended");
    }

    fn enforce(&mut self) -> Verdict {
        let verdict = guard::decide(&self.path, &self.state.borrow());
        if let Verdict::RedirectTo(target) = &verdict {
            info!(from = %self.path, to = %target, "route guard redirect");
            self.navigator.redirect(target);
            self.path.clone_from(target);
        }
        verdict
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
