use std::time::Duration;
use thiserror::Error;

/// Failures while reading or following the session source
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session fetch failed: {0}")]
    Fetch(String),

    #[error("Session fetch timed out after {0:?}")]
    FetchTimeout(Duration),

    #[error("Session subscription failed: {0}")]
    Subscription(String),

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Session token expired")]
    Expired,
}

impl From<crate::backend::AuthError> for SessionError {
    fn from(error: crate::backend::AuthError) -> Self {
        SessionError::Fetch(error.to_string())
    }
}
