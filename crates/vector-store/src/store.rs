use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use crate::types::{SyncStats, ToolMatch};
use async_trait::async_trait;
use std::sync::Arc;
use toolscope_protocol::{Capability, ToolDefinition};

/// Searchable collection of embedded tools.
///
/// Every implementation shares the same contract:
///
/// - `sync` takes the complete tool list. Tools whose content is unchanged
///   keep their embedding, new or changed tools are embedded in one batch,
///   tools missing from the list are dropped. An empty list clears the
///   store. On error the previous contents stay searchable.
/// - `search` ranks by cosine similarity, drops scores below `threshold`
///   and returns at most `count` hits, best first. Equal scores keep sync
///   order.
#[async_trait]
pub trait ToolStore<C: Capability>: Send + Sync {
    async fn sync(
        &self,
        definitions: &[Arc<ToolDefinition<C>>],
        provider: &dyn EmbeddingProvider,
    ) -> Result<SyncStats>;

    async fn search(&self, query: &[f32], count: usize, threshold: f32)
        -> Result<Vec<ToolMatch<C>>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
