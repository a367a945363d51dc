use crate::fingerprint::Fingerprint;
use std::sync::Arc;
use toolscope_protocol::ToolDefinition;

#[derive(Debug)]
pub struct IndexedTool<C> {
    pub definition: Arc<ToolDefinition<C>>,
    pub embedding: Vec<f32>,
    pub fingerprint: Fingerprint,
}

impl<C> Clone for IndexedTool<C> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            embedding: self.embedding.clone(),
            fingerprint: self.fingerprint.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ToolMatch<C> {
    pub definition: Arc<ToolDefinition<C>>,
    pub score: f32,
}

impl<C> Clone for ToolMatch<C> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            score: self.score,
        }
    }
}

impl<C> ToolMatch<C> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

/// Outcome of one sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Tools in the index after the sync.
    pub total: usize,
    /// Tools sent to the embedding provider.
    pub embedded: usize,
    /// Tools whose embedding was carried forward.
    pub reused: usize,
    /// Previously indexed tools absent from the sync input.
    pub removed: usize,
}
