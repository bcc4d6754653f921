//! Error types for calendar retrieval.

use thiserror::Error;

/// Failures while fetching a calendar from the upstream provider.
///
/// None of these are retried. Callers decide whether a failure aborts the
/// request or is absorbed into a negative lookup result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// The provider could not be reached (connect, timeout, broken body).
    #[error("upstream transport error: {message}")]
    Transport { message: String },

    /// The provider answered with a non-success status.
    ///
    /// `body` is kept for diagnostic logging only and is never rendered to
    /// clients.
    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },

    /// The provider answered 200 but the body is not a list of holidays.
    #[error("upstream response could not be decoded: {message}")]
    Decode { message: String },
}

impl UpstreamError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport { .. } => "transport",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Decode { .. } => "decode",
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Decode {
            message: err.to_string(),
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
