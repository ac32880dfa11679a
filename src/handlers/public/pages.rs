// handlers/public/pages.rs - Landing, health and auth page descriptors

use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::middleware::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AuthPageQuery {
    pub redirect: Option<String>,
    pub error: Option<String>,
}

/// GET / - landing page; the guard never redirects here
pub async fn landing() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Career Orbit",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Track job applications and interviews",
        "pages": {
            "login": "/login (auth-only)",
            "register": "/register (auth-only)",
            "dashboard": "/dashboard (protected)",
            "applications": "/applications[/new|/:id/edit] (protected)",
            "your_applications": "/your-applications (protected)",
            "interviews": "/interviews[/new] (protected)",
            "analytics": "/analytics (protected)",
            "settings": "/settings (protected)",
        }
    }))
}

/// GET /health
pub async fn health() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}

/// GET /login - echoes where a successful sign-in will land, plus any error
pub async fn login_page(State(state): State<AppState>, Query(query): Query<AuthPageQuery>) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "login",
        "redirect": state.guard.post_login_target(query.redirect.as_deref()),
        "error": query.error,
    }))
}

/// GET /register
pub async fn register_page(Query(query): Query<AuthPageQuery>) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "register",
        "error": query.error,
    }))
}
