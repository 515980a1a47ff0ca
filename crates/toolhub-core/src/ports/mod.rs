//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces the core expects from tool adapters. They
//! contain no HTTP or API-specific details and use only domain types.

pub mod error;
pub mod tool;

pub use error::ErrorCategory;
pub use tool::{ToolCapability, ToolDescriptor};
