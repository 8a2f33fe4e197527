use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single backend call. Nothing is swallowed at the gateway; every
/// variant reaches the caller with the status and backend message it saw.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// 401/403. The session has already been expired by the time this is returned.
    #[error("Unauthorized ({status}): {}", .message.as_deref().unwrap_or("credential rejected"))]
    Unauthorized {
        status: u16,
        message: Option<String>,
    },

    /// Any other 4xx.
    #[error("Request rejected ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Validation {
        status: u16,
        message: Option<String>,
    },

    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered 2xx with a body that is not the declared shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let code = status.as_u16();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized {
                status: code,
                message,
            },
            s if s.is_client_error() => Self::Validation {
                status: code,
                message,
            },
            _ => Self::Server {
                status: code,
                message,
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. }
            | Self::Validation { status, .. }
            | Self::Server { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message, .. }
            | Self::Validation { message, .. }
            | Self::Server { message, .. } => message.as_deref(),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    pub fn is_authorization_denied(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Operator-facing text for inline error slots.
    pub fn user_message(&self) -> String {
        let msg = self.backend_message().filter(|m| !m.trim().is_empty());
        match self {
            Self::Validation { status: 422, .. } => match msg {
                Some(m) if mentions_balance(m) => "Insufficient balance.".to_string(),
                Some(m) => m.to_string(),
                None => "Validation failed.".to_string(),
            },
            Self::Validation { status: 409, .. } => {
                "Duplicate request (idempotency). Please do not retry.".to_string()
            }
            Self::Validation { status: 400, .. } => {
                msg.unwrap_or("Invalid request.").to_string()
            }
            Self::Validation { status: 404, .. } => msg.unwrap_or("Not found.").to_string(),
            Self::Server { .. } => msg
                .unwrap_or("Server error. Please try again later.")
                .to_string(),
            Self::Network(_) => "Network error. Check connection.".to_string(),
            _ => msg.unwrap_or("Something went wrong.").to_string(),
        }
    }
}

fn mentions_balance(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("insufficient") || lower.contains("balance")
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Failure of a workflow step. Preconditions are checked before any request is built.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("{0}")]
    Precondition(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WorkflowError {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Precondition(msg) => msg.clone(),
            Self::Api(err) => err.user_message(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The login endpoint answered with a credential that carries no identity.
    #[error("Login returned a credential without a readable identity")]
    InvalidCredential,

    #[error("Session storage error: {0}")]
    Storage(String),
}
