use chrono::{Duration, Utc};
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{fields, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::guard::{Guard, GuardState};
use crate::session::{Session, SessionCacheEntry, User};

#[derive(Subcommand)]
pub enum RouteCommands {
    #[command(about = "Show how a path is classified")]
    Classify {
        #[arg(help = "Request path, e.g. /applications/42/edit")]
        path: String,
    },

    #[command(about = "Evaluate the guard decision for a path")]
    Decide {
        #[arg(help = "Request path")]
        path: String,
        #[arg(long, help = "Evaluate with a signed-in session")]
        signed_in: bool,
        #[arg(long, help = "Evaluate while the session is still loading")]
        loading: bool,
        #[arg(long, help = "Make the signed-in session already expired")]
        expired: bool,
    },
}

pub async fn handle(cmd: RouteCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let guard = Guard::from_config(&config().guard);

    match cmd {
        RouteCommands::Classify { path } => {
            let class = guard.classify(&path);
            output_success(
                &output_format,
                &format!("{} is {}", path, class),
                fields(json!({ "path": path, "class": class })),
            )
        }
        RouteCommands::Decide {
            path,
            signed_in,
            loading,
            expired,
        } => {
            let entry = sample_entry(signed_in || expired, loading, expired);
            let state = GuardState::from_entry(&entry, Utc::now());
            let decision = guard.evaluate(&entry, &path);
            let location = guard.location(&decision);

            output_success(
                &output_format,
                &format!("{} -> {}", path, location.as_deref().unwrap_or("stay")),
                fields(json!({
                    "path": path,
                    "class": guard.classify(&path),
                    "state": state,
                    "decision": decision,
                    "location": location,
                })),
            )
        }
    }
}

fn sample_entry(signed_in: bool, loading: bool, expired: bool) -> SessionCacheEntry {
    if loading {
        return SessionCacheEntry::loading();
    }
    if !signed_in {
        return SessionCacheEntry::resolved(None);
    }

    let ttl = if expired { Duration::minutes(-1) } else { Duration::hours(1) };
    SessionCacheEntry::resolved(Some(Session {
        access_token: String::new(),
        refresh_token: None,
        expires_at: Utc::now() + ttl,
        user: User {
            id: Uuid::nil(),
            email: "cli@localhost".to_string(),
        },
    }))
}
