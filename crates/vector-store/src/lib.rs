//! # Toolscope Vector Store
//!
//! Embedding-backed storage and similarity search for tool definitions.
//!
//! ## Features
//!
//! - **Content fingerprints** (SHA-256) to detect unchanged tools
//! - **Incremental sync**: only new or changed tools hit the embedding provider
//! - **Single batch call** per sync, positionally aligned with its inputs
//! - **Atomic swaps**: searches never observe a half-built index
//! - **Persistent store** that keeps embeddings in JSON between runs
//!
//! ## Architecture
//!
//! ```text
//! ToolDefinition[]
//!     │
//!     ├──> Fingerprint (sha256 over name/description/schema/keywords)
//!     │      └─> diff against current entries
//!     │
//!     ├──> EmbeddingProvider::embed_batch (changed + new only)
//!     │      └─> Vector[dimensions]
//!     │
//!     └──> ToolIndex / JsonToolStore
//!            └─> brute-force cosine search
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use toolscope_protocol::{ToolDefinition, ToolSpec};
//! use toolscope_vector_store::{EmbeddingProvider, HashingEmbedder, ToolIndex, ToolStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = HashingEmbedder::default();
//!     let index = ToolIndex::new();
//!
//!     let tools = vec![Arc::new(ToolDefinition::new(
//!         "getWeather",
//!         ToolSpec::new("Current weather for a city"),
//!     ))];
//!     index.sync(&tools, &provider).await?;
//!
//!     let query = provider.embed("is it raining in Paris?").await?;
//!     for hit in index.search(&query, 5, 0.0).await? {
//!         println!("{}: {:.3}", hit.name(), hit.score);
//!     }
//!     Ok(())
//! }
//! ```

mod document;
mod embeddings;
mod error;
mod fingerprint;
mod json_store;
mod similarity;
mod store;
mod sync;
#[cfg(test)]
mod test_support;
mod tool_index;
mod types;

pub use document::render_tool_document;
pub use embeddings::{EmbeddingProvider, HashingEmbedder};
pub use error::{Result, VectorStoreError};
pub use fingerprint::{fingerprint, Fingerprint};
pub use json_store::{JsonToolStore, ToolStoreMeta, TOOL_STORE_SCHEMA_VERSION};
pub use similarity::cosine_similarity;
pub use store::ToolStore;
pub use tool_index::ToolIndex;
pub use types::{IndexedTool, SyncStats, ToolMatch};
