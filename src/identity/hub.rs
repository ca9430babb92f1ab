//! Auth-state fan-out for a single browser-like session.
//!
//! DESIGN
//! ======
//! Each subscriber owns an unbounded channel receiver, so emissions reach it
//! serially and in publish order. Publishing records the latest identity and
//! pushes it to every live sender; senders whose receiver is gone are pruned
//! on the same pass. Cancelling flips a flag the stream checks before
//! yielding, which also discards anything already buffered.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::Identity;

type Emission = Option<Identity>;

#[derive(Default)]
struct HubInner {
    current: Option<Identity>,
    listeners: HashMap<Uuid, mpsc::UnboundedSender<Emission>>,
}

fn lock(inner: &Mutex<HubInner>) -> MutexGuard<'_, HubInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Latest known identity plus the set of live subscribers.
#[derive(Clone, Default)]
pub struct AuthHub {
    inner: Arc<Mutex<HubInner>>,
}

impl AuthHub {
    #[must_use]
    pub fn new(initial: Option<Identity>) -> Self {
        Self { inner: Arc::new(Mutex::new(HubInner { current: initial, listeners: HashMap::new() })) }
    }

    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        lock(&self.inner).current.clone()
    }

    /// Register a subscriber. The current identity is queued before the
    /// subscriber becomes visible to `publish`, so it is always first.
    #[must_use]
    pub fn subscribe(&self) -> (AuthStream, Unsubscribe) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        let cancelled = Arc::new(AtomicBool::new(false));

        {
            let mut inner = lock(&self.inner);
            // Receiver is alive in this scope; the send cannot fail.
            let _ = tx.send(inner.current.clone());
            inner.listeners.insert(id, tx);
        }

        let stream = AuthStream { rx, cancelled: cancelled.clone() };
        let token = Unsubscribe { id, hub: Arc::downgrade(&self.inner), cancelled };
        (stream, token)
    }

    /// Record `identity` as current and deliver it to every subscriber.
    pub fn publish(&self, identity: Option<Identity>) {
        let mut inner = lock(&self.inner);
        inner.current.clone_from(&identity);
        inner
            .listeners
            .retain(|_, tx| tx.send(identity.clone()).is_ok());
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

/// Serial stream of auth-state emissions for one subscriber.
///
/// Ends when the subscription is cancelled or the hub is dropped.
pub struct AuthStream {
    rx: mpsc::UnboundedReceiver<Emission>,
    cancelled: Arc<AtomicBool>,
}

impl Stream for AuthStream {
    type Item = Emission;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.cancelled.load(Ordering::Acquire) {
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(_)) if self.cancelled.load(Ordering::Acquire) => Poll::Ready(None),
            other => other,
        }
    }
}

/// Cancel token returned alongside an `AuthStream`.
///
/// Dropping the token does not cancel; only `cancel` does.
pub struct Unsubscribe {
    id: Uuid,
    hub: Weak<Mutex<HubInner>>,
    cancelled: Arc<AtomicBool>,
}

impl Unsubscribe {
    /// Stop delivery. The paired stream yields nothing further, including
    /// emissions already queued.
    pub fn cancel(self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(inner) = self.hub.upgrade() {
            lock(&inner).listeners.remove(&self.id);
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "hub_test.rs"]
mod tests;
