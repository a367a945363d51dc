use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use crate::similarity::cosine_similarity;
use crate::store::ToolStore;
use crate::sync::{rebuild_entries, PriorEmbeddings};
use crate::types::{IndexedTool, SyncStats, ToolMatch};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};
use toolscope_protocol::{Capability, ToolDefinition};

/// In-memory brute-force tool index.
///
/// Readers take a cheap `Arc` snapshot; `sync` builds the next snapshot off
/// to the side and swaps it in only once it is complete.
pub struct ToolIndex<C> {
    entries: RwLock<Arc<Vec<IndexedTool<C>>>>,
    sync_lock: tokio::sync::Mutex<()>,
}

impl<C: Capability> Default for ToolIndex<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Capability> ToolIndex<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Arc::new(Vec::new())),
            sync_lock: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<IndexedTool<C>>> {
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub(crate) fn replace(&self, entries: Vec<IndexedTool<C>>) {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(entries);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<IndexedTool<C>> {
        self.snapshot()
            .iter()
            .find(|entry| entry.definition.name == name)
            .cloned()
    }

    /// Length of the stored embeddings, `None` while empty.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.snapshot().first().map(|entry| entry.embedding.len())
    }

    /// Top `count` tools scoring at least `threshold`, best first.
    #[must_use]
    pub fn rank(&self, query: &[f32], count: usize, threshold: f32) -> Vec<ToolMatch<C>> {
        let entries = self.snapshot();
        if entries.is_empty() || count == 0 {
            return Vec::new();
        }

        if let Some(dimension) = entries.first().map(|entry| entry.embedding.len()) {
            if dimension != query.len() {
                log::warn!(
                    "Query embedding has {} dimensions but the index holds {dimension}; all scores are 0",
                    query.len()
                );
            }
        }

        let mut scores: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (idx, cosine_similarity(query, &entry.embedding)))
            .filter(|(_, score)| *score >= threshold)
            .collect();

        // Stable: equal scores keep sync order.
        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scores.truncate(count);

        scores
            .into_iter()
            .map(|(idx, score)| ToolMatch {
                definition: Arc::clone(&entries[idx].definition),
                score,
            })
            .collect()
    }
}

#[async_trait]
impl<C: Capability> ToolStore<C> for ToolIndex<C> {
    async fn sync(
        &self,
        definitions: &[Arc<ToolDefinition<C>>],
        provider: &dyn EmbeddingProvider,
    ) -> Result<SyncStats> {
        let _guard = self.sync_lock.lock().await;
        let current = self.snapshot();
        let prior: PriorEmbeddings<'_> = current
            .iter()
            .map(|entry| {
                (
                    entry.definition.name.as_str(),
                    (&entry.fingerprint, entry.embedding.as_slice()),
                )
            })
            .collect();

        let rebuilt = rebuild_entries(definitions, &prior, provider).await?;
        let stats = rebuilt.stats;
        self.replace(rebuilt.entries);

        if stats.total == 0 {
            log::info!("Tool index cleared ({} tools removed)", stats.removed);
        } else {
            log::info!(
                "Tool index synced: {} tools ({} embedded, {} reused, {} removed)",
                stats.total,
                stats.embedded,
                stats.reused,
                stats.removed
            );
        }
        Ok(stats)
    }

    async fn search(
        &self,
        query: &[f32],
        count: usize,
        threshold: f32,
    ) -> Result<Vec<ToolMatch<C>>> {
        Ok(self.rank(query, count, threshold))
    }

    fn len(&self) -> usize {
        self.snapshot().len()
    }
}
