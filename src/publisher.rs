//! Notification publisher
//!
//! Fans each notification out to the registered observers. Every observer
//! owns an unbounded mpsc queue, so publishing never blocks and each
//! observer sees notifications in publish order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::trace;

use crate::error::AppError;
use crate::notification::{Notification, NotificationKind};

/// Handle identifying a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

/// Receiving side of an observer registration
///
/// Dropping it deregisters the observer on the next publish.
#[derive(Debug)]
pub struct Subscription {
    id: ObserverId,
    receiver: mpsc::UnboundedReceiver<Notification>,
}

impl Subscription {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Wait for the next notification
    ///
    /// Returns `None` once the observer is unsubscribed or the publisher is gone.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.receiver.recv().await
    }

    /// Take the next notification if one is already queued
    pub fn try_recv(&mut self) -> Option<Notification> {
        self.receiver.try_recv().ok()
    }
}

struct Observer {
    id: ObserverId,
    kind: Option<NotificationKind>,
    sender: mpsc::UnboundedSender<Notification>,
}

impl Observer {
    fn wants(&self, kind: NotificationKind) -> bool {
        self.kind.map_or(true, |k| k == kind)
    }
}

/// Observer registry
#[derive(Default)]
pub struct Publisher {
    next_id: AtomicU64,
    observers: Mutex<Vec<Observer>>,
    reporters: Mutex<Vec<mpsc::UnboundedSender<Arc<AppError>>>>,
}

impl Publisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register for every notification kind
    pub fn subscribe(&self) -> Subscription {
        self.register(None)
    }

    /// Register for a single notification kind
    pub fn subscribe_to(&self, kind: NotificationKind) -> Subscription {
        self.register(Some(kind))
    }

    fn register(&self, kind: Option<NotificationKind>) -> Subscription {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::unbounded_channel();
        lock(&self.observers).push(Observer { id, kind, sender });
        trace!(%id, "Observer registered");
        Subscription { id, receiver }
    }

    /// Remove an observer
    ///
    /// Returns false if the id was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = lock(&self.observers);
        let before = observers.len();
        observers.retain(|o| o.id != id);
        before != observers.len()
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        lock(&self.observers)
            .iter()
            .filter(|o| !o.sender.is_closed())
            .count()
    }

    /// Deliver one notification to every interested observer
    ///
    /// With no observers this does nothing.
    pub fn publish(&self, notification: Notification) {
        let kind = notification.kind();
        let mut observers = lock(&self.observers);
        observers.retain(|observer| {
            if observer.wants(kind) {
                observer.sender.send(notification.clone()).is_ok()
            } else {
                !observer.sender.is_closed()
            }
        });
        trace!(%kind, observers = observers.len(), "Notification published");
    }

    /// Open a stream of reported failures (malformed inbound frames)
    pub fn reports(&self) -> mpsc::UnboundedReceiver<Arc<AppError>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        lock(&self.reporters).push(sender);
        receiver
    }

    /// Report a failure to every report stream
    pub fn report(&self, error: AppError) {
        let error = Arc::new(error);
        lock(&self.reporters).retain(|r| r.send(Arc::clone(&error)).is_ok());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
