use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::error::SessionError;
use super::source::{AuthBroadcaster, SessionSource, Subscription};
use super::types::{AuthChange, AuthEvent, Session};
use crate::backend::{AuthBackend, AuthError, SignUpOutcome};

/// Client-side auth object: holds the current session for one context and
/// announces every sign-in, sign-out and refresh to its subscribers.
pub struct AuthClient<B> {
    backend: B,
    current: Mutex<Option<Session>>,
    broadcaster: AuthBroadcaster,
}

impl<B: AuthBackend> AuthClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: Mutex::new(None),
            broadcaster: AuthBroadcaster::new(),
        }
    }

    /// Start from a persisted session (e.g. restored from storage)
    pub fn with_session(backend: B, session: Option<Session>) -> Self {
        Self {
            current: Mutex::new(session),
            ..Self::new(backend)
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> Option<Session> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn store(&self, event: AuthEvent, session: Option<Session>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = session.clone();
        tracing::info!(%event, user = session.as_ref().map(|s| s.user.email.as_str()), "auth state changed");
        self.broadcaster.emit(AuthChange::new(event, session));
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.backend.sign_in_with_password(email, password).await?;
        self.store(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let outcome = self.backend.sign_up(email, password).await?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.store(AuthEvent::SignedIn, Some(session.clone()));
        }
        Ok(outcome)
    }

    /// Local sign-out always succeeds; a failed backend revocation is only logged
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.current.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(session) = previous {
            if let Err(e) = self.backend.sign_out(&session.access_token).await {
                tracing::warn!(error = %e, "backend sign-out failed, clearing local session anyway");
            }
        }
        self.store(AuthEvent::SignedOut, None);
        Ok(())
    }

    pub async fn exchange_code_for_session(&self, code: &str) -> Result<Session, AuthError> {
        let session = self.backend.exchange_code_for_session(code).await?;
        self.store(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    pub async fn refresh_session(&self) -> Result<Session, AuthError> {
        let refresh_token = self
            .session()
            .and_then(|s| s.refresh_token)
            .ok_or(AuthError::MissingSession)?;

        let session = self.backend.refresh_session(&refresh_token).await?;
        self.store(AuthEvent::TokenRefreshed, Some(session.clone()));
        Ok(session)
    }
}

#[async_trait]
impl<B: AuthBackend> SessionSource for AuthClient<B> {
    /// Returns the stored session, refreshing it first when it has expired
    async fn get_current_session(&self) -> Result<Option<Session>, SessionError> {
        let Some(session) = self.session() else {
            return Ok(None);
        };
        if !session.is_expired() {
            return Ok(Some(session));
        }

        if session.refresh_token.is_none() {
            tracing::info!(user = %session.user.email, "stored session expired without refresh token");
            self.store(AuthEvent::SignedOut, None);
            return Ok(None);
        }

        match self.refresh_session().await {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
                Err(e.into())
            }
        }
    }

    fn subscribe(&self) -> Result<Subscription, SessionError> {
        Ok(self.broadcaster.subscribe())
    }
}
