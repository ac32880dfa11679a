use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::SessionError;
use super::types::{AuthChange, Session};

/// External authentication backend as seen by the session cache
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Current session, possibly cached or stale
    async fn get_current_session(&self) -> Result<Option<Session>, SessionError>;

    /// Register for push notifications. Dropping the handle unsubscribes.
    fn subscribe(&self) -> Result<Subscription, SessionError>;
}

/// Registration handle for session push notifications
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: mpsc::UnboundedReceiver<AuthChange>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next change, or `None` once the source has gone away
    pub async fn recv(&mut self) -> Option<AuthChange> {
        self.receiver.recv().await
    }

    /// Stop delivery. Consumes the handle so it can only happen once.
    pub fn unsubscribe(mut self) {
        self.receiver.close();
        tracing::debug!(subscription = self.id, "session subscription released");
    }
}

/// Fan-out of auth changes to every live subscription.
///
/// Channels are unbounded so no event is ever dropped or coalesced; closed
/// receivers are pruned on the next emit.
#[derive(Debug, Default)]
pub struct AuthBroadcaster {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(u64, mpsc::UnboundedSender<AuthChange>)>>,
}

impl AuthBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, sender));
        Subscription { id, receiver }
    }

    pub fn emit(&self, change: AuthChange) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|(id, sender)| {
            if sender.send(change.clone()).is_err() {
                tracing::debug!(subscription = id, "pruning closed session subscription");
                return false;
            }
            true
        });
    }

    /// Number of subscriptions that can still receive events
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|(_, sender)| !sender.is_closed());
        subscribers.len()
    }
}
