// handlers/protected/pages.rs - Protected page descriptors

use axum::extract::{Extension, Path};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, CurrentUser};
use crate::session::User;

fn page(name: &str, user: &User) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": name,
        "user": user,
    }))
}

/// GET /dashboard - default landing page after sign-in
pub async fn dashboard(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResponse<Value> {
    page("dashboard", &user)
}

/// GET /applications
pub async fn applications(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResponse<Value> {
    page("applications", &user)
}

/// GET /applications/new
pub async fn application_new(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResponse<Value> {
    page("application_new", &user)
}

/// GET /applications/:id/edit
pub async fn application_edit(
    Path(id): Path<String>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "application_edit",
        "application_id": id,
        "user": user,
    }))
}

/// GET /your-applications
pub async fn your_applications(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResponse<Value> {
    page("your_applications", &user)
}

pub async fn interviews(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResponse<Value> {
    page("interviews", &user)
}

pub async fn interview_new(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResponse<Value> {
    page("interview_new", &user)
}

pub async fn analytics(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResponse<Value> {
    page("analytics", &user)
}

pub async fn settings(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResponse<Value> {
    page("settings", &user)
}
