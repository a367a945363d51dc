//! Shared tool types for toolscope.
//!
//! A [`ToolDefinition`] pairs a unique name with an opaque [`Capability`]
//! payload. The retrieval engine only ever reads the capability's
//! description and input schema; executors and any other data stay inside
//! the caller's type.

mod catalog;
mod error;
mod options;
mod tool;

pub use catalog::{parse_json_or_toml, ToolCatalog, ToolCatalogEntry};
pub use error::{ProtocolError, Result};
pub use options::{RetrieveOptions, DEFAULT_MATCH_COUNT, DEFAULT_MATCH_THRESHOLD};
pub use tool::{Capability, ToolDefinition, ToolSpec};
