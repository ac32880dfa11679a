use std::sync::Arc;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use career_orbit::backend::GoTrueBackend;
use career_orbit::config::{self, AppConfig};
use career_orbit::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up BACKEND_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config: &AppConfig = config::config();
    tracing::info!("Starting Career Orbit in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set outside development");
    }

    let backend = GoTrueBackend::from_config(&config.backend).context("auth backend")?;
    let state = AppState::from_config(config, Arc::new(backend));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Career Orbit listening on http://{}", bind_addr);

    let mut router = app(state);
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    axum::serve(listener, router).await.context("server")?;
    Ok(())
}
