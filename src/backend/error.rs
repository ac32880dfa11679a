use thiserror::Error;

/// Failures reported by the hosted authentication backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("No active session")]
    MissingSession,

    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Unexpected backend response: {0}")]
    Decode(String),

    #[error("Backend not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            AuthError::Decode(error.to_string())
        } else {
            AuthError::Transport(error.to_string())
        }
    }
}
