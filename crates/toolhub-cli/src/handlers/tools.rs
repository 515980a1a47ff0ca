//! `tools` command handler.

use anyhow::Result;
use serde_json::{Value, json};

use super::print_json;
use crate::bootstrap::CliContext;

/// Remote tools of healthy servers plus local tools.
pub async fn collect(ctx: &CliContext) -> Result<Value> {
    let remote = ctx.gateway.list_all_tools().await;
    let local = ctx.tools.list_tools().await;
    Ok(json!({ "remote": remote, "local": local }))
}

pub async fn execute(ctx: &CliContext) -> Result<()> {
    print_json(&collect(ctx).await?)
}
