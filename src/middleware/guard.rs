use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{bearer_token, session_from_token};
use crate::guard::LoginReason;
use crate::session::{Session, SessionCacheEntry, SessionError, User};
use crate::state::AppState;

/// Signed-in user, inserted for requests the guard let through with a session
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Access token carried by the request: cookie first, then bearer header
pub fn request_token(state: &AppState, jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    jar.get(&state.security.session_cookie)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| bearer_token(headers))
}

/// Session carried by the request.
///
/// A missing token is "no session"; a bad or expired token is reported so the
/// caller can tell the user why they were signed out.
pub fn request_session(state: &AppState, jar: &CookieJar, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
    match request_token(state, jar, headers) {
        Some(token) => session_from_token(&token, &state.security.jwt_secret).map(Some),
        None => Ok(None),
    }
}

/// Server-side interception: classify, decide, and either redirect before any
/// handler runs or pass through with [`CurrentUser`] attached.
pub async fn route_guard_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let (session, reason) = match request_session(&state, &jar, request.headers()) {
        Ok(session) => (session, None),
        Err(SessionError::Expired) => (None, Some(LoginReason::SessionExpired)),
        Err(e) => {
            tracing::warn!(%path, error = %e, "rejecting unusable session token");
            (None, None)
        }
    };

    // Server-side lookups are synchronous, so the entry is never in the loading state
    let entry = SessionCacheEntry::resolved(session);
    let mut decision = state.guard.evaluate(&entry, &path);
    if reason.is_some() {
        decision = decision.with_reason(reason);
    }

    if let Some(target) = state.guard.location(&decision) {
        tracing::info!(%path, %target, "guard redirect");
        return Redirect::temporary(&target).into_response();
    }

    if let Some(session) = entry.session {
        request.extensions_mut().insert(CurrentUser(session.user));
    }

    next.run(request).await
}
