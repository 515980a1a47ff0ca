//! Remote tool gateway for toolhub.
//!
//! Tracks backend servers and the tools they advertise, probes their
//! liveness on demand, and routes tool calls over HTTP with a fallback to
//! the legacy call endpoint. [`McpRouter`] exposes all of it through the
//! JSON-RPC-shaped request envelope.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod error;
pub mod health;
pub mod invoker;
mod registry;
pub mod router;

pub use error::GatewayError;
pub use health::HealthProber;
pub use invoker::RemoteToolInvoker;
pub use registry::{Gateway, GatewayStatistics};
pub use router::McpRouter;

// Dev-dependencies used only by integration tests
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use wiremock as _;
