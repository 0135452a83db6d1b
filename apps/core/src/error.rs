use std::io;
use thiserror::Error;

/// Application-wide error type for the agent's service layer.
///
/// The intent parsing core never produces one of these: parsing degrades to
/// default values instead of failing.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors (config file access, etc).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents transport-level failures talking to a remote LLM service.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Represents a non-success HTTP status returned by a remote LLM service.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Represents errors specific to the actor system, such as communication failures.
    #[error("Actor error: {0}")]
    Actor(#[from] crate::actors::messages::ActorError),

    /// Represents data validation errors (e.g., invalid settings values).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., missing API keys).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The caller abandoned the request before a reply was produced.
    #[error("Request cancelled")]
    Cancelled,
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Http(s) => AppError::Http(s.clone()),
            AppError::Api { status, body } => AppError::Api {
                status: *status,
                body: body.clone(),
            },
            AppError::Actor(e) => AppError::Actor(e.clone()),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
            AppError::Cancelled => AppError::Cancelled,
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Validation(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("HTTP request timed out: {}", err))
        } else {
            AppError::Http(err.to_string())
        }
    }
}
