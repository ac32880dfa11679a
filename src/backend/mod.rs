pub mod error;
pub mod gotrue;

use async_trait::async_trait;

use crate::session::Session;

pub use error::AuthError;
pub use gotrue::GoTrueBackend;

/// Outcome of a sign-up: either a live session, or a pending email confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    ConfirmationRequired { email: String },
}

/// Hosted authentication API. Credential checks, token issue and revocation
/// all happen on the other side of this trait.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Trade the one-time code from an email link or OAuth redirect for a session
    async fn exchange_code_for_session(&self, code: &str) -> Result<Session, AuthError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError>;
}
