//! `stats` command handler.

use anyhow::Result;
use serde_json::Value;

use super::print_json;
use crate::bootstrap::CliContext;

pub async fn collect(ctx: &CliContext) -> Result<Value> {
    let stats = ctx.gateway.statistics().await;
    Ok(serde_json::to_value(stats)?)
}

pub async fn execute(ctx: &CliContext) -> Result<()> {
    print_json(&collect(ctx).await?)
}
