//! `servers` and `status` command handlers.

use anyhow::Result;
use serde_json::{Value, json};

use super::print_json;
use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Every registered server with a fresh status.
pub async fn collect(ctx: &CliContext) -> Result<Value> {
    let servers = ctx.gateway.list_servers().await;
    Ok(serde_json::to_value(servers)?)
}

pub async fn execute(ctx: &CliContext) -> Result<()> {
    print_json(&collect(ctx).await?)
}

/// Probe one server.
pub async fn collect_status(ctx: &CliContext, server_id: &str) -> Result<Value> {
    let status = ctx
        .gateway
        .try_server_status(server_id)
        .await
        .map_err(CliError::from)?;
    Ok(json!({ "id": server_id, "status": status }))
}

pub async fn execute_status(ctx: &CliContext, server_id: &str) -> Result<()> {
    print_json(&collect_status(ctx, server_id).await?)
}
