//! CLI-specific error types and exit codes.

use thiserror::Error;
use toolhub_core::{ErrorCategory, SettingsError};
use toolhub_gateway::GatewayError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Gateway failure.
    #[error("{0}")]
    Gateway(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested server or tool does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl CliError {
    /// Map error to an exit code (sysexits.h where one fits).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Gateway(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::NotFound(_) => 66, // EX_NOINPUT
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<GatewayError> for CliError {
    fn from(err: GatewayError) -> Self {
        match err.category() {
            ErrorCategory::NotFound => Self::NotFound(err.to_string()),
            ErrorCategory::Validation => Self::Arguments(err.to_string()),
            _ => Self::Gateway(err.to_string()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Arguments(String::new()).exit_code(), 2);
        assert_eq!(CliError::Config(String::new()).exit_code(), 78);
        assert_eq!(
            CliError::from(GatewayError::ToolNotFound("x".into())).exit_code(),
            66
        );
        assert_eq!(
            CliError::from(GatewayError::Transport("refused".into())).exit_code(),
            1
        );
    }
}
