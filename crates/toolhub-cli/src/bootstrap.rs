//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the gateway, the local tool registry
//! and the protocol router are constructed and wired together. Handlers
//! receive the composed [`CliContext`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use toolhub_core::{GatewaySettings, ToolRegistry, validate_settings};
use toolhub_gateway::{Gateway, McpRouter};
use tracing::{info, warn};

use crate::error::CliError;

/// Contents of a gateway configuration file.
///
/// ```json
/// {
///   "settings": { "call_timeout_ms": 10000 },
///   "servers": { "prices": { "url": "http://localhost:9001", "tools": ["crypto_price"] } }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub settings: GatewaySettings,
    /// Server id -> server info, registered in file order.
    pub servers: Map<String, Value>,
}

impl GatewayConfig {
    /// Parse configuration JSON.
    pub fn from_json(text: &str) -> Result<Self, CliError> {
        serde_json::from_str(text).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Optional configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    pub const fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// Remote server registry.
    pub gateway: Arc<Gateway>,
    /// Local tool dispatch table.
    pub tools: Arc<ToolRegistry>,
    /// Protocol request dispatcher over both.
    pub router: McpRouter,
}

/// Compose the CLI context, reading overrides from the process environment.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    bootstrap_with_env(config, |key| std::env::var(key).ok()).await
}

/// Compose the CLI context with an explicit environment lookup.
pub async fn bootstrap_with_env<F>(config: CliConfig, lookup: F) -> Result<CliContext>
where
    F: Fn(&str) -> Option<String>,
{
    let file = match &config.config_path {
        Some(path) => GatewayConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => GatewayConfig::default(),
    };

    let mut settings = GatewaySettings::with_defaults();
    settings.merge(&file.settings);
    settings.apply_env_overrides(lookup).map_err(CliError::from)?;
    validate_settings(&settings).map_err(CliError::from)?;

    let gateway = Arc::new(Gateway::new(settings).map_err(CliError::from)?);
    for (server_id, info) in file.servers {
        if !gateway.register_server(&server_id, info).await {
            warn!(server_id = %server_id, "Skipping server with invalid configuration");
        }
    }

    let tools = Arc::new(ToolRegistry::new());
    let router = McpRouter::new(Arc::clone(&gateway), Arc::clone(&tools));
    info!("Gateway ready");

    Ok(CliContext {
        gateway,
        tools,
        router,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_parse_config() {
        let config = GatewayConfig::from_json(
            r#"{"settings":{"call_timeout_ms":10},"servers":{"b":{"url":"http://b"},"a":{"url":"http://a"}}}"#,
        )
        .unwrap();
        assert_eq!(config.settings.call_timeout_ms, Some(10));
        let ids: Vec<&String> = config.servers.keys().collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_bad_config_is_config_error() {
        let err = GatewayConfig::from_json("{").unwrap_err();
        assert_eq!(err.exit_code(), 78);
    }

    #[tokio::test]
    async fn test_bootstrap_registers_servers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"servers":{{"s1":{{"url":"http://127.0.0.1:9","tools":["ping"]}},"bad":{{"tools":7}}}}}}"#
        )
        .unwrap();

        let ctx = bootstrap_with_env(CliConfig::new(Some(file.path().to_path_buf())), no_env)
            .await
            .unwrap();
        assert!(ctx.gateway.get_server("s1").await.is_some());
        assert!(ctx.gateway.get_server("bad").await.is_none());
        assert_eq!(ctx.gateway.routing_table().await.len(), 1);
    }

    #[tokio::test]
    async fn test_env_overrides_are_validated() {
        let result = bootstrap_with_env(CliConfig::default(), |key| {
            (key == "TOOLHUB_HEALTH_TIMEOUT_MS").then(|| "0".to_string())
        })
        .await;
        let err = result.err().unwrap();
        assert_eq!(err.downcast_ref::<CliError>().unwrap().exit_code(), 78);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = bootstrap_with_env(
            CliConfig::new(Some(PathBuf::from("/nonexistent/toolhub.json"))),
            no_env,
        )
        .await;
        let err = result.err().unwrap();
        assert_eq!(err.downcast_ref::<CliError>().unwrap().exit_code(), 74);
    }
}
