//! Scoped provisioning of the session view.
//!
//! A `SessionHandle` is made available to everything running inside
//! `provide_session` through a task-local. Reading it anywhere else is a
//! programming error: `use_session` reports it, `expect_session` panics.

use std::future::Future;

use tokio::sync::watch;

use super::SessionState;

tokio::task_local! {
    static SESSION: SessionHandle;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("session context used outside of its provisioning scope")]
    NotProvisioned,
}

/// Cloneable, read-only view of a `SessionContext`'s state.
#[derive(Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub(crate) fn new(rx: watch::Receiver<SessionState>) -> Self {
        Self { rx }
    }

    #[must_use]
    pub fn current(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    /// Wait for the next state change. Returns `None` once the owning
    /// context is gone.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

/// Run `fut` with `handle` provisioned.
pub async fn provide_session<F: Future>(handle: SessionHandle, fut: F) -> F::Output {
    SESSION.scope(handle, fut).await
}

/// Run `f` synchronously with `handle` provisioned.
pub fn provide_session_sync<R>(handle: SessionHandle, f: impl FnOnce() -> R) -> R {
    SESSION.sync_scope(handle, f)
}

/// # Errors
///
/// Returns `NotProvisioned` outside `provide_session`.
pub fn use_session() -> Result<SessionHandle, ContextError> {
    SESSION.try_with(SessionHandle::clone).map_err(|_| ContextError::NotProvisioned)
}

/// # Panics
///
/// Panics outside `provide_session`.
#[must_use]
pub fn expect_session() -> SessionHandle {
    match use_session() {
        Ok(handle) => handle,
        Err(e) => panic!("{e}"),
    }
}

#[cfg(test)]
#[path = "scope_test.rs"]
mod tests;
