//! Tool capability port.
//!
//! Every local tool adapter implements this trait. The dispatch table holds
//! `Arc<dyn ToolCapability>` handles, so any adapter that satisfies the
//! contract can be registered.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Arguments, ResultItem};

/// Contract implemented by every locally registered tool.
///
/// # Example
///
/// ```ignore
/// struct Ping;
///
/// #[async_trait]
/// impl ToolCapability for Ping {
///     fn name(&self) -> &str { "ping" }
///     fn description(&self) -> &str { "Reply with pong" }
///     fn input_schema(&self) -> Value { json!({ "type": "object", "properties": {} }) }
///     async fn execute(&self, _arguments: Arguments) -> Vec<ResultItem> {
///         vec![ResultItem::default().with("pong", json!(true))]
///     }
/// }
/// ```
#[async_trait]
pub trait ToolCapability: Send + Sync {
    /// Stable tool name.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON-schema-like description of the accepted arguments.
    fn input_schema(&self) -> Value;

    /// Execute the tool.
    ///
    /// Business-level failures are reported as error items
    /// (`[{"error": "..."}]`), never as panics.
    async fn execute(&self, arguments: Arguments) -> Vec<ResultItem>;
}

/// Discovery metadata for a registered tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}
