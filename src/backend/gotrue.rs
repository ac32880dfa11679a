// GoTrue-compatible auth API client (the hosted backend's /auth/v1 surface)

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{AuthBackend, AuthError, SignUpOutcome};
use crate::config::BackendConfig;
use crate::session::{Session, User};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: UserResponse,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(|| now + Duration::seconds(self.expires_in.unwrap_or(3600)));

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: User {
                id: self.user.id,
                email: self.user.email.unwrap_or_default(),
            },
        }
    }
}

#[derive(Clone)]
pub struct GoTrueBackend {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl GoTrueBackend {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, AuthError> {
        if config.url.trim().is_empty() {
            return Err(AuthError::NotConfigured("BACKEND_URL is empty".to_string()));
        }
        Ok(Self::new(config.url.clone(), config.anon_key.clone()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        let response = check_status(response, grant_type == "password").await?;
        let token = response.json::<TokenResponse>().await?;
        Ok(token.into_session(Utc::now()))
    }
}

/// Map non-2xx responses onto [`AuthError`], keeping the backend's own message
async fn check_status(response: Response, credentials_grant: bool) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.clone());

    if credentials_grant && matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
        tracing::debug!(%status, %message, "password grant rejected");
        return Err(AuthError::InvalidCredentials);
    }

    Err(AuthError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl AuthBackend for GoTrueBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let response = self
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body = check_status(response, false).await?.json::<Value>().await?;

        // Auto-confirming projects answer with a session, others with the bare user
        if body.get("access_token").is_some() {
            let token: TokenResponse =
                serde_json::from_value(body).map_err(|e| AuthError::Decode(e.to_string()))?;
            return Ok(SignUpOutcome::SignedIn(token.into_session(Utc::now())));
        }

        Ok(SignUpOutcome::ConfirmationRequired {
            email: email.to_string(),
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        check_status(response, false).await?;
        Ok(())
    }

    async fn exchange_code_for_session(&self, code: &str) -> Result<Session, AuthError> {
        self.token_grant("pkce", json!({ "auth_code": code })).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }
}
