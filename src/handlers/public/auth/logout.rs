// handlers/public/auth/logout.rs - POST /auth/logout handler

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::utils::cleared_session_cookie;
use crate::guard::LoginReason;
use crate::middleware::request_token;
use crate::state::AppState;

/// POST /auth/logout - revoke the session and clear the cookie
///
/// Always ends on the login page with `error=signed_out`; a backend that
/// cannot be reached does not keep the user signed in locally.
pub async fn logout_post(State(state): State<AppState>, jar: CookieJar, request: Request) -> Response {
    if let Some(token) = request_token(&state, &jar, request.headers()) {
        if let Err(e) = state.backend.sign_out(&token).await {
            tracing::warn!(error = %e, "backend sign-out failed, clearing cookie anyway");
        }
    }

    let jar = jar.add(cleared_session_cookie(&state.security));
    let target = state.guard.login_url(None, Some(LoginReason::SignedOut));
    (jar, Redirect::to(&target)).into_response()
}
