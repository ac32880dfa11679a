// handlers/public/auth/register.rs - POST /auth/register handler

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use super::utils::{session_cookie, Credentials};
use crate::backend::SignUpOutcome;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// POST /auth/register - create an account
///
/// Projects that confirm by email answer 202 and the user finishes through
/// /auth/callback; auto-confirming projects sign the user in straight away.
pub async fn register_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<Response, ApiError> {
    let (email, password) = credentials.validate()?;

    match state.backend.sign_up(email, password).await? {
        SignUpOutcome::SignedIn(session) => {
            tracing::info!(user = %session.user.email, "registered and signed in");
            let jar = jar.add(session_cookie(&state.security, &session));
            Ok((jar, Redirect::to(state.guard.default_path())).into_response())
        }
        SignUpOutcome::ConfirmationRequired { email } => {
            tracing::info!(%email, "registration pending email confirmation");
            Ok(ApiResponse::accepted(json!({
                "confirmation_required": true,
                "email": email,
            }))
            .into_response())
        }
    }
}
