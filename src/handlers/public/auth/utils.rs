// handlers/public/auth/utils.rs - Shared helpers for the auth flows

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::session::Session;

/// Email + password body for login and register
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Both fields must be present; the backend does the real checking
    pub fn validate(&self) -> Result<(&str, &str), ApiError> {
        let email = self.email.trim();
        let mut field_errors = HashMap::new();

        if email.is_empty() {
            field_errors.insert("email".to_string(), "This field is required".to_string());
        }
        if self.password.is_empty() {
            field_errors.insert("password".to_string(), "This field is required".to_string());
        }

        if !field_errors.is_empty() {
            return Err(ApiError::validation_error("Missing required fields", Some(field_errors)));
        }
        Ok((email, self.password.as_str()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect: Option<String>,
}

/// HttpOnly session cookie that lives exactly as long as the access token
pub fn session_cookie(security: &SecurityConfig, session: &Session) -> Cookie<'static> {
    let ttl = (session.expires_at - Utc::now()).num_seconds().max(0);

    Cookie::build((security.session_cookie.clone(), session.access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(security.cookie_secure)
        .max_age(time::Duration::seconds(ttl))
        .build()
}

pub fn cleared_session_cookie(security: &SecurityConfig) -> Cookie<'static> {
    Cookie::build((security.session_cookie.clone(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(security.cookie_secure)
        .max_age(time::Duration::ZERO)
        .build()
}
