// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use super::utils::{session_cookie, Credentials, RedirectQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /auth/login?redirect=/path - sign in with email and password
///
/// On success the session cookie is set and the browser is sent (303) to the
/// page it originally asked for, or the dashboard when that target is missing
/// or unsafe. Bad credentials answer 401 without touching cookies.
pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<RedirectQuery>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, ApiError> {
    let (email, password) = credentials.validate()?;

    let session = state.backend.sign_in_with_password(email, password).await.map_err(|e| {
        tracing::info!(%email, error = %e, "sign-in failed");
        ApiError::from(e)
    })?;

    let target = state.guard.post_login_target(query.redirect.as_deref());
    tracing::info!(user = %session.user.email, %target, "signed in");

    let jar = jar.add(session_cookie(&state.security, &session));
    Ok((jar, Redirect::to(&target)).into_response())
}
