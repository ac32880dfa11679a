use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::backend::GoTrueBackend;
use crate::cli::utils::{fields, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::guard::Guard;
use crate::session::{AuthClient, SessionCache};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in with email and password")]
    Login {
        #[arg(long, help = "Account email")]
        email: String,
        #[arg(long, help = "Account password")]
        password: String,
        #[arg(long, help = "Page that sent the user to /login")]
        redirect: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login {
            email,
            password,
            redirect,
        } => {
            let app = config();
            let backend = GoTrueBackend::from_config(&app.backend).context("auth backend")?;
            let client = Arc::new(AuthClient::new(backend));
            let guard = Guard::from_config(&app.guard);

            // The cache sees the sign-in through the client's event stream
            let cache = SessionCache::new(client.clone())
                .with_fetch_timeout(app.guard.session_fetch_timeout_ms.map(std::time::Duration::from_millis));
            cache.initialize().await;
            let mut changes = cache.watch();

            let session = client.sign_in_with_password(&email, &password).await?;
            changes
                .wait_for(|entry| entry.session.is_some())
                .await
                .context("session cache closed before sign-in landed")?;

            let target = guard.post_login_target(redirect.as_deref());
            let decision = guard.evaluate(&cache.snapshot(), &target);
            cache.teardown();

            output_success(
                &output_format,
                &format!("Signed in as {}", session.user.email),
                fields(json!({
                    "user_id": session.user.id,
                    "expires_at": session.expires_at,
                    "target": target,
                    "decision": decision,
                })),
            )
        }
    }
}
