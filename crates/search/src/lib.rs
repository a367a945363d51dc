//! Query-time tool selection: semantic hits merged with explicit `[name]`
//! references.

mod error;
mod retriever;
mod selection;
mod syntax;

pub use error::{Result, RetrievalError};
pub use retriever::{QueryOutcome, ToolRetriever};
pub use selection::{SelectedTool, ToolSelection};
pub use syntax::extract_explicit_tools;
pub use toolscope_protocol::RetrieveOptions;
