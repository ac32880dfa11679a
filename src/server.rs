use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::handlers::{protected, public};
use crate::middleware::route_guard_middleware;
use crate::state::AppState;

/// Full application router.
///
/// The guard wraps every route, including the fallback, so unknown protected
/// paths still redirect instead of answering 404 to anonymous visitors.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::landing))
        .route("/health", get(public::health))
        // Auth-only pages and auth flows
        .merge(auth_public_routes())
        // Protected pages
        .merge(protected_routes())
        .layer(middleware::from_fn_with_state(state.clone(), route_guard_middleware))
        // Global middleware
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/login", get(public::login_page))
        .route("/register", get(public::register_page))
        .route("/auth/login", post(auth::login_post))
        .route("/auth/register", post(auth::register_post))
        .route("/auth/logout", post(auth::logout_post))
        .route("/auth/callback", get(auth::callback_get))
}

fn protected_routes() -> Router<AppState> {
    use protected as pages;

    Router::new()
        .route("/dashboard", get(pages::dashboard))
        .route("/applications", get(pages::applications))
        .route("/applications/new", get(pages::application_new))
        .route("/applications/:id/edit", get(pages::application_edit))
        .route("/your-applications", get(pages::your_applications))
        .route("/interviews", get(pages::interviews))
        .route("/interviews/new", get(pages::interview_new))
        .route("/analytics", get(pages::analytics))
        .route("/settings", get(pages::settings))
}
