//! Error types for posture management API operations.

use thiserror::Error;

/// Errors that can occur during posture management API operations.
#[derive(Debug, Error)]
pub enum PostureError {
    /// Configuration is missing or incomplete.
    #[error("posture API configuration required: {0}")]
    ConfigMissing(String),

    /// Configuration is present but malformed.
    #[error("Invalid posture API configuration: {0}")]
    InvalidConfig(String),

    /// A request was rejected before it was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API request failed with a non-success status.
    #[error("posture API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The continuation link of a list response cannot be turned into an offset.
    #[error("Invalid pagination cursor '{cursor}': {reason}")]
    InvalidCursor { cursor: String, reason: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Coarse classification of a [`PostureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or a non-2xx response.
    Transport,
    /// The response body did not match the expected shape.
    Decode,
    /// The client is not configured correctly.
    Config,
    /// The caller supplied invalid input.
    InvalidRequest,
}

impl PostureError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ApiError { .. } | Self::HttpError(_) | Self::RateLimited { .. } => {
                ErrorKind::Transport
            }
            Self::ParseError(_) | Self::InvalidCursor { .. } => ErrorKind::Decode,
            Self::ConfigMissing(_) | Self::InvalidConfig(_) | Self::UrlError(_) => {
                ErrorKind::Config
            }
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// Returns true for network and HTTP status failures.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Returns true when a response could not be decoded.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        self.kind() == ErrorKind::Decode
    }

    /// HTTP status code of the failed response, if there was one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => *status_code,
            Self::RateLimited { .. } => Some(429),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for posture management operations.
pub type Result<T> = core::result::Result<T, PostureError>;
