//! Command-line front end for the toolhub gateway.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for unit-test builds
#[cfg(test)]
use wiremock as _;

// Used only by the binary
use dotenvy as _;
use tracing_subscriber as _;

// Runtime is driven by the binary and the tests
use tokio as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, GatewayConfig, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
