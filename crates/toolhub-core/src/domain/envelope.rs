//! Invocation envelope: the JSON-RPC-shaped wrapper exchanged with backends.
//!
//! On the wire the protocol version is written under both `protocol_version`
//! and the JSON-RPC member name `jsonrpc`, and read from whichever is present.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Protocol version carried by every envelope.
pub const PROTOCOL_VERSION: &str = "2.0";

/// Method names understood by backends and by the protocol router.
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const SERVICES_LIST: &str = "services/list";
    pub const PROMPTS_LIST: &str = "prompts/list";
    pub const NOTIFICATION_CANCEL: &str = "notifications/cancel";
    pub const NOTIFICATION_INITIALIZED: &str = "notifications/initialized";
}

/// Standard JSON-RPC error codes.
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    /// Implementation-defined server error (tool routing failures).
    pub const SERVER_ERROR: i64 = -32000;
}

fn default_version() -> String {
    PROTOCOL_VERSION.to_string()
}

fn resolve_version(protocol_version: Option<String>, jsonrpc: Option<String>) -> String {
    protocol_version.or(jsonrpc).unwrap_or_else(default_version)
}

/// Keeps an explicit `null` distinct from an absent member.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Request correlation id: a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::String(id.to_string())
    }
}

/// Request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RequestWire", into = "RequestWire")]
pub struct InvocationRequest {
    pub protocol_version: String,
    pub id: Option<RequestId>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct RequestWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    protocol_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<RequestId>,
    method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

impl From<RequestWire> for InvocationRequest {
    fn from(wire: RequestWire) -> Self {
        Self {
            protocol_version: resolve_version(wire.protocol_version, wire.jsonrpc),
            id: wire.id,
            method: wire.method,
            params: wire.params,
        }
    }
}

impl From<InvocationRequest> for RequestWire {
    fn from(request: InvocationRequest) -> Self {
        Self {
            jsonrpc: Some(request.protocol_version.clone()),
            protocol_version: Some(request.protocol_version),
            id: request.id,
            method: request.method,
            params: request.params,
        }
    }
}

impl InvocationRequest {
    /// Create a request for a method.
    pub fn new(id: Option<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            protocol_version: default_version(),
            id,
            method: method.into(),
            params,
        }
    }

    /// Build a `tools/list` request.
    pub fn tools_list(id: Option<RequestId>) -> Self {
        Self::new(id, methods::TOOLS_LIST, None)
    }

    /// Build a `tools/call` request with `params = {name, arguments}`.
    pub fn tools_call(id: Option<RequestId>, tool_name: &str, arguments: Value) -> Self {
        Self::new(
            id,
            methods::TOOLS_CALL,
            Some(json!({ "name": tool_name, "arguments": arguments })),
        )
    }

    /// Look up a named parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|p| p.get(key))
    }
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Response envelope. `result` and `error` are mutually exclusive.
///
/// `result: Some(Value::Null)` is a present `null`, not a missing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ResponseWire", into = "ResponseWire")]
pub struct InvocationResponse {
    pub protocol_version: String,
    pub id: Option<RequestId>,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

#[derive(Serialize, Deserialize)]
struct ResponseWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    protocol_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<RequestId>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

impl From<ResponseWire> for InvocationResponse {
    fn from(wire: ResponseWire) -> Self {
        Self {
            protocol_version: resolve_version(wire.protocol_version, wire.jsonrpc),
            id: wire.id,
            result: wire.result,
            error: wire.error,
        }
    }
}

impl From<InvocationResponse> for ResponseWire {
    fn from(response: InvocationResponse) -> Self {
        Self {
            jsonrpc: Some(response.protocol_version.clone()),
            protocol_version: Some(response.protocol_version),
            id: response.id,
            result: response.result,
            error: response.error,
        }
    }
}

/// Why a response envelope did not yield a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The server answered with an error object.
    #[error("Server error {code}: {message}")]
    Remote { code: i64, message: String },

    /// Neither `result` nor `error` was present.
    #[error("No result from server")]
    MissingResult,
}

impl InvocationResponse {
    /// Build a success response.
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            protocol_version: default_version(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build a failure response.
    pub fn failure(id: Option<RequestId>, code: i64, message: impl Into<String>) -> Self {
        Self {
            protocol_version: default_version(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Unwrap the `result` member.
    pub fn into_result(self) -> Result<Value, EnvelopeError> {
        match (self.result, self.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(EnvelopeError::Remote {
                code: error.code,
                message: error.message,
            }),
            (None, None) => Err(EnvelopeError::MissingResult),
        }
    }
}
