//! Service registry: registered servers, the routing table and call routing.
//!
//! All state lives behind one `RwLock` so that register and unregister are
//! atomic with respect to route lookups. The lock is never held across a
//! network request.

use futures_util::FutureExt;
use futures_util::future::join_all;
use indexmap::IndexMap;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::RwLock;
use toolhub_core::{
    Arguments, GatewaySettings, RemoteToolListing, ServerInfo, ServerRecord, ServerStatus,
    ServerView, error_value,
};
use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::health::HealthProber;
use crate::invoker::RemoteToolInvoker;

#[derive(Debug, Default)]
struct GatewayState {
    /// Registered servers, in registration order.
    servers: IndexMap<String, ServerRecord>,
    /// Tool name -> owning server id.
    routing: HashMap<String, String>,
}

/// Aggregate view over every registered server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayStatistics {
    pub total_servers: usize,
    pub online_servers: usize,
    pub total_tools: usize,
    pub health_summary: IndexMap<String, ServerStatus>,
}

/// Tracks remote backend servers and routes tool calls to them.
///
/// Construct one per process and share it by handle (`Arc<Gateway>`).
pub struct Gateway {
    state: RwLock<GatewayState>,
    prober: HealthProber,
    invoker: RemoteToolInvoker,
    settings: GatewaySettings,
}

impl Gateway {
    /// Create a gateway with its own HTTP client.
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .build()
            .map_err(GatewayError::ClientBuild)?;
        Ok(Self::with_client(client, settings))
    }

    /// Create a gateway around an existing HTTP client.
    pub fn with_client(client: Client, settings: GatewaySettings) -> Self {
        let health_timeout = Duration::from_millis(settings.effective_health_timeout_ms());
        let call_timeout = Duration::from_millis(settings.effective_call_timeout_ms());
        Self {
            state: RwLock::new(GatewayState::default()),
            prober: HealthProber::new(client.clone(), health_timeout),
            invoker: RemoteToolInvoker::new(client, call_timeout),
            settings,
        }
    }

    pub const fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Register a server from loosely typed info.
    ///
    /// Returns `false` (and logs) when the info does not describe a server.
    pub async fn register_server(&self, server_id: &str, info: Value) -> bool {
        let info = match serde_json::from_value::<ServerInfo>(info) {
            Ok(info) => info,
            Err(e) => {
                warn!(server_id = %server_id, error = %e, "Rejected malformed server info");
                return false;
            }
        };

        match self.register(server_id, info).await {
            Ok(()) => true,
            Err(e) => {
                warn!(server_id = %server_id, error = %e, "Failed to register server");
                false
            }
        }
    }

    /// Register (or overwrite) a server and claim routing for its tools.
    ///
    /// A tool already routed to another server is taken over by this one.
    pub async fn register(&self, server_id: &str, info: ServerInfo) -> Result<(), GatewayError> {
        if server_id.trim().is_empty() {
            return Err(GatewayError::InvalidRegistration(
                "server id cannot be empty".to_string(),
            ));
        }

        let record = ServerRecord::from_info(server_id, info);
        let mut state = self.state.write().await;

        state.routing.retain(|_, owner| owner != server_id);
        for tool in &record.tools {
            if let Some(previous) = state.routing.insert(tool.clone(), server_id.to_string()) {
                warn!(
                    tool_name = %tool,
                    previous_server = %previous,
                    server_id = %server_id,
                    "Tool already routed to another server, overriding"
                );
            }
        }

        let tool_count = record.tools.len();
        state.servers.insert(server_id.to_string(), record);
        info!(server_id = %server_id, tools = tool_count, "Registered server");
        Ok(())
    }

    /// Remove a server and every routing entry pointing at it.
    pub async fn unregister_server(&self, server_id: &str) -> bool {
        let mut state = self.state.write().await;
        if state.servers.shift_remove(server_id).is_none() {
            return false;
        }
        state.routing.retain(|_, owner| owner != server_id);
        info!(server_id = %server_id, "Unregistered server");
        true
    }

    /// Probe a server and record whether it is healthy.
    ///
    /// Unregistered ids yield [`ServerStatus::Unknown`] without any request.
    pub async fn get_server_status(&self, server_id: &str) -> ServerStatus {
        self.try_server_status(server_id)
            .await
            .unwrap_or(ServerStatus::Unknown)
    }

    /// Probe a registered server, failing with [`GatewayError::ServerNotFound`]
    /// for an unknown id.
    pub async fn try_server_status(&self, server_id: &str) -> Result<ServerStatus, GatewayError> {
        let url = self
            .state
            .read()
            .await
            .servers
            .get(server_id)
            .map(|record| record.url.clone())
            .ok_or_else(|| GatewayError::ServerNotFound(server_id.to_string()))?;

        let status = self.prober.probe(&url).await;
        debug!(server_id = %server_id, status = %status, "Probed server");

        // The server may have been unregistered or moved while the probe was in flight.
        match self.state.write().await.servers.get_mut(server_id) {
            Some(record) if record.url == url => record.healthy = status.is_callable(),
            Some(_) => debug!(
                server_id = %server_id,
                probed_url = %url,
                "Server moved during probe, keeping its health flag"
            ),
            None => {}
        }
        Ok(status)
    }

    /// Tools offered by servers currently marked healthy. No probing.
    ///
    /// A tool taken over by a later registration is listed only under the
    /// server it routes to.
    pub async fn list_all_tools(&self) -> Vec<RemoteToolListing> {
        let state = self.state.read().await;
        let routing = &state.routing;
        state
            .servers
            .values()
            .filter(|record| record.healthy)
            .flat_map(move |record| {
                record
                    .tools
                    .iter()
                    .filter(move |tool| routing.get(tool.as_str()) == Some(&record.id))
                    .map(move |tool| RemoteToolListing {
                        name: tool.clone(),
                        server_id: record.id.clone(),
                        server_name: record.name.clone(),
                        description: format!("Tool from {}", record.name),
                    })
            })
            .collect()
    }

    /// Every registered server with a freshly probed status.
    pub async fn list_servers(&self) -> Vec<ServerView> {
        let ids: Vec<String> = self.state.read().await.servers.keys().cloned().collect();
        let statuses = join_all(ids.iter().map(|id| self.get_server_status(id))).await;

        let state = self.state.read().await;
        ids.iter()
            .zip(statuses)
            .filter_map(|(id, status)| state.servers.get(id).map(|record| record.view(status)))
            .collect()
    }

    /// Route a call and flatten failures into an error item.
    pub async fn route_tool_call(&self, tool_name: &str, arguments: Arguments) -> Value {
        let outcome = AssertUnwindSafe(self.try_route_tool_call(tool_name, &arguments))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(tool_name = %tool_name, category = %e.category(), error = %e, "Tool call failed");
                error_value(e.to_string())
            }
            Err(_) => {
                warn!(tool_name = %tool_name, "Tool call panicked");
                error_value(format!("Tool call failed: internal error routing '{tool_name}'"))
            }
        }
    }

    /// Route a call to the server that owns `tool_name`.
    ///
    /// Uses the stored health flag; an unhealthy owner is rejected without
    /// any network request.
    pub async fn try_route_tool_call(
        &self,
        tool_name: &str,
        arguments: &Arguments,
    ) -> Result<Value, GatewayError> {
        let (server_id, url) = {
            let state = self.state.read().await;
            let record = state
                .routing
                .get(tool_name)
                .and_then(|server_id| state.servers.get(server_id))
                .ok_or_else(|| GatewayError::ToolNotFound(tool_name.to_string()))?;
            if !record.healthy {
                return Err(GatewayError::ServerUnavailable(tool_name.to_string()));
            }
            (record.id.clone(), record.url.clone())
        };

        debug!(tool_name = %tool_name, server_id = %server_id, "Routing tool call");
        self.invoker.invoke(&url, tool_name, arguments).await
    }

    /// Snapshot of a registered server.
    pub async fn get_server(&self, server_id: &str) -> Option<ServerRecord> {
        self.state.read().await.servers.get(server_id).cloned()
    }

    /// Snapshot of the server a tool routes to.
    pub async fn server_for_tool(&self, tool_name: &str) -> Option<ServerRecord> {
        let state = self.state.read().await;
        state
            .routing
            .get(tool_name)
            .and_then(|server_id| state.servers.get(server_id))
            .cloned()
    }

    /// Copy of the routing table.
    pub async fn routing_table(&self) -> HashMap<String, String> {
        self.state.read().await.routing.clone()
    }

    /// Re-probe every server and summarize.
    pub async fn statistics(&self) -> GatewayStatistics {
        let servers = self.list_servers().await;
        let total_tools = self.state.read().await.routing.len();
        let health_summary: IndexMap<String, ServerStatus> = servers
            .iter()
            .map(|view| (view.id.clone(), view.status))
            .collect();

        GatewayStatistics {
            total_servers: servers.len(),
            online_servers: servers
                .iter()
                .filter(|view| view.status.is_callable())
                .count(),
            total_tools,
            health_summary,
        }
    }
}
