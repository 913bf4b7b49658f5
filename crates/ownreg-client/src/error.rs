use ownreg_protocol::ErrorCode;
use ownreg_service::ServiceError;
use thiserror::Error;

/// Failures of a remote owner operation as seen by the client.
///
/// Each rejection carries the server's display message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The server answered with a 5xx.
    #[error("server error: {0}")]
    Server(String),

    /// No usable answer: connection failure, timeout, undecodable body.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// Classify a failed response from its status, error code and message.
    pub fn from_failure(status: u16, code: Option<ErrorCode>, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("request failed with status {status}"));
        match code {
            Some(ErrorCode::Validation) | Some(ErrorCode::BadRequest) => Self::Validation(message),
            Some(ErrorCode::Conflict) => Self::Conflict(message),
            Some(ErrorCode::NotFound) => Self::NotFound(message),
            Some(ErrorCode::Transient) => Self::Server(message),
            None => match status {
                404 => Self::NotFound(message),
                400..=499 => Self::Validation(message),
                _ => Self::Server(message),
            },
        }
    }

    /// The message the server supplied, if the server answered at all.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Validation(m) | Self::Conflict(m) | Self::NotFound(m) | Self::Server(m) => {
                Some(m)
            }
            Self::Transport(_) => None,
        }
    }

    /// Retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Server(_) | Self::Transport(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<ServiceError> for ClientError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation { .. } => Self::Validation(err.to_string()),
            ServiceError::Conflict { .. } => Self::Conflict(err.to_string()),
            ServiceError::NotFound(_) => Self::NotFound("Owner not found".into()),
            ServiceError::Transient(_) => Self::Server("Server Error".into()),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
