//! Protocol method dispatch.
//!
//! [`McpRouter`] answers request envelopes by method name, combining the
//! local [`ToolRegistry`] with remote tools reachable through the
//! [`Gateway`]. Every request yields a response envelope carrying the
//! request id; failures become error objects, never Rust errors.

use serde_json::{Value, json};
use std::sync::Arc;
use toolhub_core::domain::envelope::{codes, methods};
use toolhub_core::{Arguments, InvocationRequest, InvocationResponse, RequestId, ToolRegistry};
use tracing::{debug, warn};

use crate::registry::Gateway;

/// Dispatches protocol requests to the gateway and the local tool registry.
#[derive(Clone)]
pub struct McpRouter {
    gateway: Arc<Gateway>,
    tools: Arc<ToolRegistry>,
}

impl McpRouter {
    pub const fn new(gateway: Arc<Gateway>, tools: Arc<ToolRegistry>) -> Self {
        Self { gateway, tools }
    }

    /// Handle a raw JSON request body.
    pub async fn handle_json(&self, body: &str) -> InvocationResponse {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => self.handle_value(value).await,
            Err(e) => InvocationResponse::failure(None, codes::PARSE_ERROR, format!("Parse error: {e}")),
        }
    }

    /// Handle a decoded JSON request.
    pub async fn handle_value(&self, value: Value) -> InvocationResponse {
        let id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());
        match serde_json::from_value::<InvocationRequest>(value) {
            Ok(request) => self.handle(request).await,
            Err(e) => InvocationResponse::failure(
                id,
                codes::INVALID_REQUEST,
                format!("Invalid request: {e}"),
            ),
        }
    }

    /// Handle a request envelope.
    pub async fn handle(&self, request: InvocationRequest) -> InvocationResponse {
        debug!(method = %request.method, "Handling protocol request");
        let id = request.id.clone();
        match request.method.as_str() {
            methods::INITIALIZE => InvocationResponse::success(id, self.initialize()),
            methods::TOOLS_LIST => InvocationResponse::success(id, self.list_tools().await),
            methods::TOOLS_CALL => self.call_tool(&request).await,
            methods::SERVICES_LIST => {
                let services = self.gateway.list_servers().await;
                InvocationResponse::success(id, json!({ "services": services }))
            }
            methods::PROMPTS_LIST => InvocationResponse::success(id, json!({ "prompts": [] })),
            methods::NOTIFICATION_CANCEL => {
                InvocationResponse::success(id, json!({ "cancelled": true }))
            }
            methods::NOTIFICATION_INITIALIZED => {
                InvocationResponse::success(id, json!({ "initialized": true }))
            }
            other => InvocationResponse::failure(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Unknown method: {other}"),
            ),
        }
    }

    fn initialize(&self) -> Value {
        let settings = self.gateway.settings();
        json!({
            "protocolVersion": settings.effective_protocol_version(),
            "capabilities": {
                "tools": {},
                "resources": {},
                "prompts": {}
            },
            "serverInfo": {
                "name": settings.effective_server_name(),
                "version": settings.effective_server_version()
            }
        })
    }

    async fn list_tools(&self) -> Value {
        let mut tools: Vec<Value> = self
            .gateway
            .list_all_tools()
            .await
            .into_iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "server_id": tool.server_id,
                    "server_name": tool.server_name
                })
            })
            .collect();

        for descriptor in self.tools.list_tools().await {
            tools.push(json!({
                "name": descriptor.name,
                "description": descriptor.description,
                "inputSchema": descriptor.input_schema
            }));
        }

        json!({ "tools": tools })
    }

    async fn call_tool(&self, request: &InvocationRequest) -> InvocationResponse {
        let id = request.id.clone();
        let Some(name) = request
            .param("name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
        else {
            return InvocationResponse::failure(id, codes::INVALID_PARAMS, "Tool name is required");
        };

        let arguments: Arguments = match request.param("arguments") {
            None | Some(Value::Null) => Arguments::new(),
            Some(Value::Object(arguments)) => arguments.clone(),
            Some(_) => {
                return InvocationResponse::failure(
                    id,
                    codes::INVALID_PARAMS,
                    "Tool arguments must be an object",
                );
            }
        };

        if self.tools.contains(name).await {
            let response = self.tools.execute_tool(name, arguments).await;
            return InvocationResponse::success(id, response.to_value());
        }

        match self.gateway.try_route_tool_call(name, &arguments).await {
            Ok(result) => InvocationResponse::success(id, result),
            Err(e) => {
                warn!(tool_name = %name, category = %e.category(), error = %e, "Remote tool call failed");
                InvocationResponse::failure(id, codes::SERVER_ERROR, e.to_string())
            }
        }
    }
}
