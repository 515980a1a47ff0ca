//! Command handlers.
//!
//! Handlers follow one pattern:
//! - `collect(ctx, ...)` performs the gateway operation and returns JSON
//! - `execute(ctx, ...)` calls `collect` and prints the result to stdout

pub mod call;
pub mod request;
pub mod servers;
pub mod stats;
pub mod tools;

use anyhow::Result;
use serde::Serialize;

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
