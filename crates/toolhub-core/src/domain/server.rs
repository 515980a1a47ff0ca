//! Backend server domain types.
//!
//! These types describe remote tool servers as the gateway sees them. They are
//! never persisted; a record lives exactly as long as its registration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Liveness status computed by a health probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// A probe observed a 200 from the health endpoint or the tools/list probe
    Online,
    /// Both probes failed to produce a 200
    Offline,
    /// The health endpoint answered with an unexpected status
    Error,
    /// The server id is not registered
    #[default]
    Unknown,
}

impl ServerStatus {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }

    /// Whether tool calls may be routed to a server in this state.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive information supplied by the caller when registering a server.
///
/// Every field is optional on the wire; missing values fall back to the
/// defaults applied by [`ServerRecord::from_info`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    /// Display name (defaults to the server id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Human-readable description.
    pub description: String,

    /// Base URL the gateway uses to reach the server.
    pub url: String,

    /// Tool names the server claims to provide, in advertised order.
    pub tools: Vec<String>,

    /// Free-form metadata, not interpreted by the gateway.
    pub metadata: Map<String, Value>,
}

impl ServerInfo {
    /// Create server info for a base URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append advertised tools.
    #[must_use]
    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools.extend(tools.into_iter().map(Into::into));
        self
    }
}

/// A registered backend server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Caller-supplied identity and routing key.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Human-readable description.
    pub description: String,

    /// Base URL of the server.
    pub url: String,

    /// Tools this server claims to provide, deduplicated, in advertised order.
    pub tools: Vec<String>,

    /// Free-form metadata.
    pub metadata: Map<String, Value>,

    /// Last-observed liveness. Optimistically `true` on registration.
    pub healthy: bool,
}

impl ServerRecord {
    /// Build a record from registration info.
    ///
    /// Duplicate tool names are collapsed, keeping the first occurrence.
    pub fn from_info(id: impl Into<String>, info: ServerInfo) -> Self {
        let id = id.into();
        let mut tools: Vec<String> = Vec::with_capacity(info.tools.len());
        for tool in info.tools {
            if !tools.contains(&tool) {
                tools.push(tool);
            }
        }

        Self {
            name: info.name.unwrap_or_else(|| id.clone()),
            id,
            description: info.description,
            url: info.url,
            tools,
            metadata: info.metadata,
            healthy: true,
        }
    }

    /// Whether this server advertises the given tool.
    #[must_use]
    pub fn provides(&self, tool_name: &str) -> bool {
        self.tools.iter().any(|t| t == tool_name)
    }

    /// Snapshot this record together with a freshly computed status.
    #[must_use]
    pub fn view(&self, status: ServerStatus) -> ServerView {
        ServerView {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
            status,
            tools: self.tools.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Externally visible server listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub status: ServerStatus,
    pub tools: Vec<String>,
    pub metadata: Map<String, Value>,
}

/// A tool offered by a healthy remote server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteToolListing {
    /// Tool name.
    pub name: String,
    /// Id of the server that owns it.
    pub server_id: String,
    /// Display name of the owning server.
    pub server_name: String,
    /// Human-readable description.
    pub description: String,
}
