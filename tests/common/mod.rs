#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use career_orbit::auth::{generate_jwt, Claims};
use career_orbit::backend::{AuthBackend, AuthError, SignUpOutcome};
use career_orbit::config::{GuardConfig, SecurityConfig};
use career_orbit::guard::Guard;
use career_orbit::session::{Session, User};
use career_orbit::{app, AppState};

pub const SECRET: &str = "integration-test-secret";
pub const COOKIE: &str = "orbit-access-token";
pub const PASSWORD: &str = "correct-horse";
pub const GOOD_CODE: &str = "good-code";

pub fn security() -> SecurityConfig {
    SecurityConfig {
        jwt_secret: SECRET.to_string(),
        jwt_expiry_hours: 1,
        session_cookie: COOKIE.to_string(),
        cookie_secure: false,
    }
}

/// Signed access token for `email`, valid for an hour
pub fn token_for(email: &str) -> String {
    generate_jwt(&Claims::new(Uuid::new_v4(), email, 1), SECRET).expect("mint token")
}

/// Signed access token that expired a minute ago
pub fn expired_token_for(email: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4(),
        email: email.to_string(),
        role: "authenticated".to_string(),
        exp: now - 60,
        iat: now - 3600,
    };
    generate_jwt(&claims, SECRET).expect("mint token")
}

fn session_for(email: &str) -> Session {
    let token = token_for(email);
    let claims = career_orbit::auth::validate_jwt(&token, SECRET).expect("valid token");
    Session {
        access_token: token,
        refresh_token: Some("refresh".to_string()),
        expires_at: Utc.timestamp_opt(claims.exp, 0).single().expect("exp"),
        user: User {
            id: claims.sub,
            email: email.to_string(),
        },
    }
}

/// In-process stand-in for the hosted auth API
#[derive(Default)]
pub struct FakeBackend {
    pub signed_out: Mutex<Vec<String>>,
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if password != PASSWORD {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(session_for(email))
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<SignUpOutcome, AuthError> {
        if email.starts_with("confirm") {
            return Ok(SignUpOutcome::ConfirmationRequired {
                email: email.to_string(),
            });
        }
        Ok(SignUpOutcome::SignedIn(session_for(email)))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.signed_out.lock().unwrap().push(access_token.to_string());
        Ok(())
    }

    async fn exchange_code_for_session(&self, code: &str) -> Result<Session, AuthError> {
        if code != GOOD_CODE {
            return Err(AuthError::Rejected {
                status: 400,
                message: "invalid flow state".to_string(),
            });
        }
        Ok(session_for("callback@example.com"))
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<Session, AuthError> {
        Err(AuthError::MissingSession)
    }
}

pub struct TestApp {
    pub router: Router,
    pub backend: Arc<FakeBackend>,
}

impl TestApp {
    pub fn new() -> Self {
        let backend = Arc::new(FakeBackend::default());
        let state = AppState::new(Guard::from_config(&GuardConfig::default()), security(), backend.clone());
        Self {
            router: app(state),
            backend,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<Response<Body>> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<Response<Body>> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{}={}", COOKIE, token));
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Result<Response<Body>> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?;
        self.send(request).await
    }
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `name=value` part of the session Set-Cookie header, if one was sent
pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(COOKIE))
        .map(str::to_string)
}

pub async fn json_body(response: Response<Body>) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
