//! Gateway error type.

use thiserror::Error;
use toolhub_core::{EnvelopeError, ErrorCategory};

/// Errors that can occur while routing a tool call or managing servers.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    #[error("Server for tool '{0}' is offline")]
    ServerUnavailable(String),

    #[error("Server '{0}' not found")]
    ServerNotFound(String),

    #[error("Invalid server registration: {0}")]
    InvalidRegistration(String),

    #[error("Tool call failed: {0}")]
    Transport(String),

    #[error("Server error: {status}")]
    HttpStatus { status: u16 },

    #[error("Invalid response from server: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl GatewayError {
    /// Classify this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ToolNotFound(_) | Self::ServerNotFound(_) => ErrorCategory::NotFound,
            Self::ServerUnavailable(_) => ErrorCategory::Unavailable,
            Self::InvalidRegistration(_) => ErrorCategory::Validation,
            Self::Transport(_) => ErrorCategory::Transport,
            Self::HttpStatus { .. } | Self::MalformedResponse(_) | Self::Envelope(_) => {
                ErrorCategory::Protocol
            }
            Self::ClientBuild(_) => ErrorCategory::Internal,
        }
    }
}
