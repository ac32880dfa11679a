// handlers/public/auth/callback.rs - GET /auth/callback handler

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use url::form_urlencoded;

use super::utils::session_cookie;
use crate::guard::ERROR_PARAM;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub redirect: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET /auth/callback?code=... - finish an email-link or OAuth sign-in
///
/// The guard never intercepts this path. Without a code the visitor is sent
/// back to the login page; a provider error or a failed exchange is surfaced
/// there through the `error` parameter.
pub async fn callback_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(message) = query.error_description.as_deref().or(query.error.as_deref()) {
        tracing::warn!(error = message, "provider returned an error to the callback");
        return Redirect::temporary(&login_with_error(state.guard.login_path(), message)).into_response();
    }

    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return Redirect::temporary(state.guard.login_path()).into_response();
    };

    match state.backend.exchange_code_for_session(code).await {
        Ok(session) => {
            let target = state.guard.post_login_target(query.redirect.as_deref());
            tracing::info!(user = %session.user.email, %target, "code exchanged for session");
            let jar = jar.add(session_cookie(&state.security, &session));
            (jar, Redirect::temporary(&target)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "code exchange failed");
            Redirect::temporary(&login_with_error(state.guard.login_path(), &e.to_string())).into_response()
        }
    }
}

fn login_with_error(login_path: &str, message: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(ERROR_PARAM, message)
        .finish();
    format!("{}?{}", login_path, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_is_encoded() {
        assert_eq!(
            login_with_error("/login", "Invalid code & state"),
            "/login?error=Invalid+code+%26+state"
        );
    }
}
