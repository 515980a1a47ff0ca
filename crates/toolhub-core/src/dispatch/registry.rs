//! Local tool dispatch table and response normalization.
//!
//! [`ToolRegistry`] owns every locally registered tool. `execute_tool` is the
//! single entry point: look up, sanitize, validate, run, format. It always
//! produces a [`ToolResponse`]; failures at any stage become the standard
//! error envelope.

use futures_util::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::format::{ResponseFormatter, default_formatters, format_generic};
use super::validator::{sanitize, validate_required, validate_types};
use crate::domain::{Arguments, ResultItem, ToolResponse};
use crate::ports::{ToolCapability, ToolDescriptor};

/// A locally registered tool with its parameter contract.
#[derive(Clone)]
pub struct ToolDispatchEntry {
    pub instance: Arc<dyn ToolCapability>,
    pub required_params: Vec<String>,
    pub schema: Value,
}

impl std::fmt::Debug for ToolDispatchEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatchEntry")
            .field("instance", &self.instance.name())
            .field("required_params", &self.required_params)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Dispatch table for local tools.
///
/// Construct one per process and share it by handle; tests build isolated
/// instances.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, ToolDispatchEntry>>,
    formatters: RwLock<HashMap<String, ResponseFormatter>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a registry with the built-in formatters installed.
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
            formatters: RwLock::new(default_formatters()),
        }
    }

    /// Register (or replace) a tool under `name`.
    pub async fn register_tool(
        &self,
        name: impl Into<String>,
        instance: Arc<dyn ToolCapability>,
        required_params: Vec<String>,
        schema: Value,
    ) {
        let name = name.into();
        let entry = ToolDispatchEntry {
            instance,
            required_params,
            schema,
        };
        let previous = self.tools.write().await.insert(name.clone(), entry);
        if previous.is_some() {
            info!(tool_name = %name, "Replaced local tool registration");
        } else {
            info!(tool_name = %name, "Registered local tool");
        }
    }

    /// Register a tool under its own name, taking the contract from its schema.
    pub async fn register_capability(&self, instance: Arc<dyn ToolCapability>) {
        let schema = instance.input_schema();
        let required = required_from_schema(&schema);
        let name = instance.name().to_string();
        self.register_tool(name, instance, required, schema).await;
    }

    /// Install a formatter for one tool name.
    pub async fn register_formatter(
        &self,
        tool_name: impl Into<String>,
        formatter: ResponseFormatter,
    ) {
        self.formatters
            .write()
            .await
            .insert(tool_name.into(), formatter);
    }

    /// Look up a dispatch entry.
    pub async fn get(&self, name: &str) -> Option<ToolDispatchEntry> {
        self.tools.read().await.get(name).cloned()
    }

    /// Whether a tool is registered under `name`.
    pub async fn contains(&self, name: &str) -> bool {
        self.tools.read().await.contains_key(name)
    }

    /// Descriptors of all registered tools, sorted by name.
    pub async fn list_tools(&self) -> Vec<ToolDescriptor> {
        let tools = self.tools.read().await;
        let mut descriptors: Vec<ToolDescriptor> = tools
            .iter()
            .map(|(name, entry)| ToolDescriptor {
                name: name.clone(),
                description: entry.instance.description().to_string(),
                input_schema: entry.schema.clone(),
            })
            .collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Run a registered tool and normalize its output.
    pub async fn execute_tool(&self, name: &str, arguments: Arguments) -> ToolResponse {
        let Some(entry) = self.get(name).await else {
            debug!(tool_name = %name, "Local tool not found");
            return ToolResponse::error(format!("Tool '{name}' not found"));
        };

        let mut cleaned = sanitize(&arguments);
        if let Err(e) = validate_required(&cleaned, &entry.required_params, name) {
            debug!(tool_name = %name, error = %e, "Rejected tool arguments");
            return ToolResponse::error(e.to_string());
        }
        if let Err(e) = validate_types(&mut cleaned, &entry.schema, name) {
            debug!(tool_name = %name, error = %e, "Rejected tool arguments");
            return ToolResponse::error(e.to_string());
        }

        let outcome = AssertUnwindSafe(entry.instance.execute(cleaned))
            .catch_unwind()
            .await;
        match outcome {
            Ok(items) => self.format_results(name, &items).await,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(tool_name = %name, error = %message, "Tool execution panicked");
                ToolResponse::error(format!("Tool execution failed: {message}"))
            }
        }
    }

    /// Normalize a result list produced by `tool_name`.
    ///
    /// An empty list or one containing any error item becomes an error
    /// envelope listing every error message.
    pub async fn format_results(&self, tool_name: &str, items: &[ResultItem]) -> ToolResponse {
        if items.is_empty() {
            return ToolResponse::error(format!("No results found for {tool_name}"));
        }

        let errors: Vec<String> = items.iter().filter_map(ResultItem::error_message).collect();
        if !errors.is_empty() {
            return ToolResponse::error(format!("Tool execution errors: {}", errors.join(", ")));
        }

        let formatter = self.formatters.read().await.get(tool_name).cloned();
        let rendered = catch_unwind(AssertUnwindSafe(|| match &formatter {
            Some(format) => format(items, tool_name),
            None => format_generic(items, tool_name),
        }));

        match rendered {
            Ok(text) => ToolResponse::text(text),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(tool_name = %tool_name, error = %message, "Response formatter panicked");
                ToolResponse::error(format!("Response formatting failed: {message}"))
            }
        }
    }
}

fn required_from_schema(schema: &Value) -> Vec<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
