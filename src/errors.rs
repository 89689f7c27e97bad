use reqwest::StatusCode;
use thiserror::Error;

pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// Failures surfaced to the user. Only the message is shown; none are retried.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the server's `error` field verbatim.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Session storage error: {0}")]
    Session(#[from] rusqlite::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
