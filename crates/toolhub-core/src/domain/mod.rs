//! Domain types shared by the dispatch layer and the gateway.
//!
//! # Design
//!
//! - `ServerInfo` / `ServerRecord` - a registered backend and its advertised tools
//! - `ServerStatus` - outcome of a health probe
//! - `InvocationRequest` / `InvocationResponse` - the JSON-RPC-shaped envelope
//! - `ResultItem` - one element of a tool's result list
//! - `ToolResponse` - the normalized `{content: [...]}` envelope

pub mod envelope;
mod result;
mod server;

pub use envelope::{
    EnvelopeError, InvocationRequest, InvocationResponse, PROTOCOL_VERSION, RequestId, RpcError,
};
pub use result::{Arguments, ContentItem, ERROR_KEY, ResultItem, ToolResponse, error_value};
pub use server::{RemoteToolListing, ServerInfo, ServerRecord, ServerStatus, ServerView};
