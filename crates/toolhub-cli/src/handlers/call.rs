//! `call` command handler.

use anyhow::Result;
use serde_json::Value;
use toolhub_core::Arguments;

use super::print_json;
use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Parse `--args` into an argument map. Absent means no arguments.
pub fn parse_arguments(raw: Option<&str>) -> Result<Arguments, CliError> {
    let Some(raw) = raw else {
        return Ok(Arguments::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(arguments)) => Ok(arguments),
        Ok(_) => Err(CliError::Arguments(
            "--args must be a JSON object".to_string(),
        )),
        Err(e) => Err(CliError::Arguments(format!("--args is not valid JSON: {e}"))),
    }
}

/// Route a call. Locally registered tools take precedence.
pub async fn collect(ctx: &CliContext, tool: &str, raw_args: Option<&str>) -> Result<Value> {
    let arguments = parse_arguments(raw_args)?;
    if ctx.tools.contains(tool).await {
        return Ok(ctx.tools.execute_tool(tool, arguments).await.to_value());
    }
    let result = ctx
        .gateway
        .try_route_tool_call(tool, &arguments)
        .await
        .map_err(CliError::from)?;
    Ok(result)
}

pub async fn execute(ctx: &CliContext, tool: &str, raw_args: Option<&str>) -> Result<()> {
    print_json(&collect(ctx, tool, raw_args).await?)
}
