//! Core domain types, ports and the local dispatch layer for toolhub.
//!
//! This crate has no network code. The gateway crate builds on the domain
//! types defined here; the binary wires both together.
#![deny(unused_crate_dependencies)]

pub mod dispatch;
pub mod domain;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use dispatch::{
    ParamType, ResponseFormatter, ToolDispatchEntry, ToolRegistry, ValidationError, sanitize,
    validate_required, validate_types,
};
pub use domain::{
    Arguments, ContentItem, ERROR_KEY, EnvelopeError, InvocationRequest, InvocationResponse,
    PROTOCOL_VERSION, RemoteToolListing, RequestId, ResultItem, RpcError, ServerInfo,
    ServerRecord, ServerStatus, ServerView, ToolResponse, error_value,
};
pub use ports::{ErrorCategory, ToolCapability, ToolDescriptor};
pub use settings::{
    DEFAULT_CALL_TIMEOUT_MS, DEFAULT_HEALTH_TIMEOUT_MS, GatewaySettings, SettingsError,
    validate_settings,
};

// Silence unused dev-dependency warnings for unit-test builds
#[cfg(test)]
use mockall as _;
