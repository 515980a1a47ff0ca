//! Error categories shared across crates.
//!
//! Every failure the gateway or the dispatch layer reports falls into one of
//! these buckets. Callers never see raw transport or serde errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categories of tool-routing and dispatch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Unknown tool name or server id.
    NotFound,
    /// Owning server is marked unhealthy; no call was attempted.
    Unavailable,
    /// Network failure or timeout at an HTTP boundary.
    Transport,
    /// Response received but unusable (bad status, malformed envelope).
    Protocol,
    /// Missing or uncoercible parameter.
    Validation,
    /// Unknown/internal error.
    Internal,
}

impl ErrorCategory {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unavailable => "unavailable",
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
