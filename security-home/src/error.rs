use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session expired")]
    Unauthorized,

    #[error("Not found: {}", .0.as_deref().unwrap_or("no detail"))]
    NotFound(Option<String>),

    #[error("Backend returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ApiError {
    /// Backend-provided `detail` message, if the error carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::NotFound(detail) | ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }
}

/// Failure reading or writing the device-local session entry.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage is corrupt: {0}")]
    Format(#[from] serde_json::Error),
}

/// Outcome taxonomy of dashboard operations.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// 401 from the backend or no stored token. Fatal to the session.
    #[error("Session expired")]
    AuthExpired,

    /// Search found nothing; carries the backend detail when there was one.
    #[error("Not found")]
    NotFound(Option<String>),

    /// Network, timeout or unexpected status; prior state is kept.
    #[error("Transient failure: {0}")]
    Transient(#[source] ApiError),

    /// Rejected locally before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("A search is already in progress")]
    Busy,

    /// The screen was unmounted or its session has ended.
    #[error("Dashboard is no longer active")]
    Inactive,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<ApiError> for DashboardError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => DashboardError::AuthExpired,
            ApiError::NotFound(detail) => DashboardError::NotFound(detail),
            other => DashboardError::Transient(other),
        }
    }
}

impl DashboardError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, DashboardError::AuthExpired)
    }
}
