use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::error::SessionError;
use super::source::SessionSource;
use super::types::{AuthEvent, Session, User};

/// Last known authentication state for one context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCacheEntry {
    pub session: Option<Session>,
    /// True only until the first fetch result or push notification lands
    pub is_loading: bool,
    pub last_updated: DateTime<Utc>,
    /// Ticket of the write that produced this entry; 0 before any write
    pub seq: u64,
    pub last_event: Option<AuthEvent>,
}

impl SessionCacheEntry {
    pub fn loading() -> Self {
        Self {
            session: None,
            is_loading: true,
            last_updated: Utc::now(),
            seq: 0,
            last_event: None,
        }
    }

    /// Already-settled entry, as produced by a synchronous lookup
    pub fn resolved(session: Option<Session>) -> Self {
        Self {
            session,
            is_loading: false,
            last_updated: Utc::now(),
            seq: 0,
            last_event: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }
}

struct CacheCore {
    entry: watch::Sender<SessionCacheEntry>,
    next_seq: AtomicU64,
}

impl CacheCore {
    fn issue_ticket(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a write carrying `ticket`. Writes older than the stored ticket are
    /// dropped but still end the loading window.
    fn write(&self, ticket: u64, event: AuthEvent, session: Option<Session>) -> bool {
        let mut applied = false;
        self.entry.send_if_modified(|entry| {
            if ticket <= entry.seq {
                tracing::debug!(ticket, current = entry.seq, %event, "discarding stale session write");
                if entry.is_loading {
                    entry.is_loading = false;
                    return true;
                }
                return false;
            }
            entry.session = session;
            entry.is_loading = false;
            entry.last_updated = Utc::now();
            entry.seq = ticket;
            entry.last_event = Some(event);
            applied = true;
            true
        });
        applied
    }

    /// Pushes take their ticket under the write lock, so arrival order is write order
    fn push(&self, event: AuthEvent, session: Option<Session>) {
        self.entry.send_modify(|entry| {
            let ticket = self.issue_ticket();
            tracing::debug!(ticket, %event, signed_in = session.is_some(), "session change received");
            entry.session = session;
            entry.is_loading = false;
            entry.last_updated = Utc::now();
            entry.seq = ticket;
            entry.last_event = Some(event);
        });
    }
}

/// Process-wide view of "who is signed in right now", fed by a [`SessionSource`].
///
/// Created in the loading state. [`SessionCache::initialize`] registers for push
/// notifications and issues the initial fetch; whichever resolves last wins, and
/// a fetch that resolves after a newer push is discarded. Dependents follow
/// changes through [`SessionCache::watch`].
pub struct SessionCache {
    core: Arc<CacheCore>,
    source: Arc<dyn SessionSource>,
    fetch_timeout: Option<Duration>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionCache {
    pub fn new(source: Arc<dyn SessionSource>) -> Self {
        let (entry, _) = watch::channel(SessionCacheEntry::loading());
        Self {
            core: Arc::new(CacheCore {
                entry,
                next_seq: AtomicU64::new(0),
            }),
            source,
            fetch_timeout: None,
            listener: Mutex::new(None),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Subscribe to changes, then resolve the current session once.
    ///
    /// Never fails: fetch errors and timeouts resolve to "no session".
    pub async fn initialize(&self) {
        self.start_listener();

        let ticket = self.core.issue_ticket();
        let session = match self.fetch().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "initial session fetch failed, treating as signed out");
                None
            }
        };

        if self.core.write(ticket, AuthEvent::InitialSession, session) {
            tracing::debug!(ticket, "initial session applied");
        }
    }

    async fn fetch(&self) -> Result<Option<Session>, SessionError> {
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, self.source.get_current_session())
                .await
                .map_err(|_| SessionError::FetchTimeout(limit))?,
            None => self.source.get_current_session().await,
        }
    }

    fn start_listener(&self) {
        let mut listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        if listener.is_some() {
            return;
        }

        let mut subscription = match self.source.subscribe() {
            Ok(subscription) => subscription,
            Err(e) => {
                tracing::error!(error = %e, "could not subscribe to session changes, keeping last known session");
                return;
            }
        };

        let core = Arc::clone(&self.core);
        *listener = Some(tokio::spawn(async move {
            while let Some(change) = subscription.recv().await {
                core.push(change.event, change.session);
            }
            tracing::warn!(
                subscription = subscription.id(),
                "session change channel closed, keeping last known session"
            );
        }));
    }

    /// Subscription callback: overwrite the cached session with the pushed value
    pub fn on_change(&self, event: AuthEvent, session: Option<Session>) {
        self.core.push(event, session);
    }

    /// Release the push subscription. Returns false if nothing was registered.
    pub fn teardown(&self) -> bool {
        let handle = self.listener.lock().unwrap_or_else(PoisonError::into_inner).take();
        match handle {
            Some(handle) => {
                handle.abort();
                tracing::debug!("session cache torn down");
                true
            }
            None => false,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    pub fn snapshot(&self) -> SessionCacheEntry {
        self.core.entry.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<SessionCacheEntry> {
        self.core.entry.subscribe()
    }
}

impl Drop for SessionCache {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::source::{AuthBroadcaster, Subscription};
    use crate::session::types::AuthChange;
    use async_trait::async_trait;
    use tokio::sync::Notify;
    use uuid::Uuid;

    fn session_for(email: &str) -> Session {
        Session {
            access_token: format!("token-{email}"),
            refresh_token: None,
            expires_at: Utc::now() + chrono::Duration::hours(1),
            user: User {
                id: Uuid::new_v4(),
                email: email.to_string(),
            },
        }
    }

    /// Source whose fetch can be held open until the test releases it
    struct ScriptedSource {
        broadcaster: AuthBroadcaster,
        fetch_result: Mutex<Result<Option<Session>, SessionError>>,
        gate: Option<Notify>,
        fail_subscribe: bool,
    }

    impl ScriptedSource {
        fn returning(result: Result<Option<Session>, SessionError>) -> Self {
            Self {
                broadcaster: AuthBroadcaster::new(),
                fetch_result: Mutex::new(result),
                gate: None,
                fail_subscribe: false,
            }
        }

        fn gated(result: Result<Option<Session>, SessionError>) -> Self {
            Self {
                gate: Some(Notify::new()),
                ..Self::returning(result)
            }
        }

        fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.notify_one();
            }
        }
    }

    #[async_trait]
    impl SessionSource for ScriptedSource {
        async fn get_current_session(&self) -> Result<Option<Session>, SessionError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.fetch_result.lock().unwrap().clone()
        }

        fn subscribe(&self) -> Result<Subscription, SessionError> {
            if self.fail_subscribe {
                return Err(SessionError::Subscription("channel refused".into()));
            }
            Ok(self.broadcaster.subscribe())
        }
    }

    async fn wait_for_subscriber(source: &ScriptedSource) {
        while source.broadcaster.subscriber_count() == 0 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn starts_loading_and_resolves_from_fetch() {
        let alice = session_for("alice@example.com");
        let source = Arc::new(ScriptedSource::returning(Ok(Some(alice.clone()))));
        let cache = SessionCache::new(source.clone());

        assert!(cache.snapshot().is_loading);
        cache.initialize().await;

        let entry = cache.snapshot();
        assert!(!entry.is_loading);
        assert_eq!(entry.session, Some(alice));
        assert_eq!(entry.last_event, Some(AuthEvent::InitialSession));
        assert!(cache.is_subscribed());
    }

    #[tokio::test]
    async fn fetch_failure_resolves_as_signed_out() {
        let source = Arc::new(ScriptedSource::returning(Err(SessionError::Fetch("backend down".into()))));
        let cache = SessionCache::new(source);

        cache.initialize().await;

        let entry = cache.snapshot();
        assert!(!entry.is_loading);
        assert!(entry.session.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_is_bounded_by_timeout() {
        let source = Arc::new(ScriptedSource::gated(Ok(Some(session_for("late@example.com")))));
        let cache = SessionCache::new(source).with_fetch_timeout(Some(Duration::from_millis(250)));

        cache.initialize().await;

        let entry = cache.snapshot();
        assert!(!entry.is_loading);
        assert!(entry.session.is_none());
    }

    #[tokio::test]
    async fn push_arriving_before_fetch_resolves_wins() {
        let stale = session_for("stale@example.com");
        let fresh = session_for("fresh@example.com");
        let source = Arc::new(ScriptedSource::gated(Ok(Some(stale))));
        let cache = Arc::new(SessionCache::new(source.clone()));
        let mut changes = cache.watch();

        let init = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.initialize().await }
        });

        wait_for_subscriber(&source).await;
        source
            .broadcaster
            .emit(AuthChange::new(AuthEvent::SignedIn, Some(fresh.clone())));
        changes.changed().await.unwrap();
        assert_eq!(changes.borrow_and_update().session, Some(fresh.clone()));

        source.release();
        init.await.unwrap();

        let entry = cache.snapshot();
        assert_eq!(entry.session, Some(fresh));
        assert_eq!(entry.last_event, Some(AuthEvent::SignedIn));
        assert!(!entry.is_loading);
    }

    #[tokio::test]
    async fn every_push_overwrites_in_arrival_order() {
        let source = Arc::new(ScriptedSource::returning(Ok(None)));
        let cache = SessionCache::new(source.clone());
        cache.initialize().await;
        let mut changes = cache.watch();

        let bob = session_for("bob@example.com");
        source
            .broadcaster
            .emit(AuthChange::new(AuthEvent::SignedIn, Some(bob.clone())));
        source.broadcaster.emit(AuthChange::new(AuthEvent::SignedOut, None));

        loop {
            changes.changed().await.unwrap();
            if changes.borrow_and_update().last_event == Some(AuthEvent::SignedOut) {
                break;
            }
        }
        let entry = cache.snapshot();
        assert!(entry.session.is_none());
        assert!(entry.seq >= 3);
    }

    #[tokio::test]
    async fn on_change_clears_loading_without_a_fetch() {
        let source = Arc::new(ScriptedSource::returning(Ok(None)));
        let cache = SessionCache::new(source);
        let carol = session_for("carol@example.com");

        cache.on_change(AuthEvent::TokenRefreshed, Some(carol.clone()));

        let entry = cache.snapshot();
        assert!(!entry.is_loading);
        assert_eq!(entry.session, Some(carol));
    }

    #[tokio::test]
    async fn teardown_releases_subscription_exactly_once() {
        let source = Arc::new(ScriptedSource::returning(Ok(None)));
        let cache = SessionCache::new(source.clone());
        cache.initialize().await;
        assert_eq!(source.broadcaster.subscriber_count(), 1);

        assert!(cache.teardown());
        assert!(!cache.teardown());

        // The aborted listener drops its receiver once the runtime polls it
        while source.broadcaster.subscriber_count() != 0 {
            tokio::task::yield_now().await;
        }
        assert!(!cache.is_subscribed());
    }

    #[tokio::test]
    async fn subscribe_failure_keeps_fetched_value() {
        let dave = session_for("dave@example.com");
        let source = Arc::new(ScriptedSource {
            fail_subscribe: true,
            ..ScriptedSource::returning(Ok(Some(dave.clone())))
        });
        let cache = SessionCache::new(source);

        cache.initialize().await;

        assert_eq!(cache.snapshot().session, Some(dave));
        assert!(!cache.is_subscribed());
    }
}
