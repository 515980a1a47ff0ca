//! `request` command handler.

use anyhow::Result;
use serde_json::Value;

use super::print_json;
use crate::bootstrap::CliContext;

/// Dispatch a raw request envelope through the protocol router.
pub async fn collect(ctx: &CliContext, envelope: &str) -> Result<Value> {
    let response = ctx.router.handle_json(envelope).await;
    Ok(serde_json::to_value(response)?)
}

pub async fn execute(ctx: &CliContext, envelope: &str) -> Result<()> {
    print_json(&collect(ctx, envelope).await?)
}
