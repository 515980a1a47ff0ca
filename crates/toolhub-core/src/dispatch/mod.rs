//! Local tool dispatch: argument validation, the dispatch table and
//! response normalization.

pub mod format;
mod registry;
pub mod validator;

pub use format::{
    ResponseFormatter, default_formatters, format_crypto_news, format_crypto_price,
    format_generic, format_search_results,
};
pub use registry::{ToolDispatchEntry, ToolRegistry};
pub use validator::{ParamType, ValidationError, sanitize, validate_required, validate_types};
