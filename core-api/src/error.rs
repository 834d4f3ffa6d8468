use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Failures of a single call attempt.
///
/// Only transport-level problems end up here. Domain failures (a missing
/// record, bad credentials) arrive as `success: false` envelopes instead.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request did not complete within the configured timeout
    #[error("Request to {operation} timed out after {timeout_ms} ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// The HTTP bridge could not deliver the request
    #[error("Network error: {0}")]
    Transport(#[from] BridgeError),

    /// The backend answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not a valid envelope
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The network path is not configured
    #[error("Backend not configured: {0}")]
    NotConfigured(&'static str),
}

impl ApiError {
    /// Whether the failure happened on the wire rather than while building
    /// the request.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout { .. } | ApiError::Transport(_) | ApiError::Status { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
