use chrono::{TimeZone, Utc};
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, validate_jwt, Claims};
use crate::cli::utils::{fields, output_success};
use crate::cli::OutputFormat;
use crate::config::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a session token signed with SECURITY_JWT_SECRET")]
    Mint {
        #[arg(long, help = "Email claim")]
        email: String,
        #[arg(long, help = "Subject (random when omitted)")]
        user_id: Option<Uuid>,
        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Validate a session token and show its claims")]
    Inspect {
        #[arg(help = "Encoded JWT")]
        token: String,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config().security;

    match cmd {
        TokenCommands::Mint { email, user_id, hours } => {
            let claims = Claims::new(
                user_id.unwrap_or_else(Uuid::new_v4),
                email,
                hours.unwrap_or(security.jwt_expiry_hours),
            );
            let token = generate_jwt(&claims, &security.jwt_secret)?;

            output_success(
                &output_format,
                &format!("Token minted for {}", claims.email),
                fields(json!({
                    "token": token,
                    "sub": claims.sub,
                    "expires_at": Utc.timestamp_opt(claims.exp, 0).single(),
                })),
            )
        }
        TokenCommands::Inspect { token } => {
            let claims = validate_jwt(token.trim(), &security.jwt_secret)?;

            output_success(
                &output_format,
                "Token is valid",
                fields(json!({
                    "sub": claims.sub,
                    "email": claims.email,
                    "role": claims.role,
                    "issued_at": Utc.timestamp_opt(claims.iat, 0).single(),
                    "expires_at": Utc.timestamp_opt(claims.exp, 0).single(),
                })),
            )
        }
    }
}
