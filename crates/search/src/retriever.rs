use crate::error::{Result, RetrievalError};
use crate::selection::ToolSelection;
use crate::syntax::extract_explicit_tools;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use toolscope_protocol::{Capability, RetrieveOptions, ToolDefinition};
use toolscope_vector_store::{
    EmbeddingProvider, SyncStats, ToolIndex, ToolMatch, ToolStore, VectorStoreError,
};

/// Result for one query of a batch.
///
/// A strict-mode unresolved reference fails only its own slot; provider and
/// store failures fail the whole batch instead.
pub type QueryOutcome<C> = std::result::Result<ToolSelection<C>, RetrievalError>;

type KnownTools<C> = HashMap<String, Arc<ToolDefinition<C>>>;

/// Picks the tools to expose for a query.
///
/// Semantic hits from the store come first, in ranked order, followed by
/// every tool the query names as `[name]`. Named tools are resolved against
/// the full tool set, so they are included even when they would not rank.
pub struct ToolRetriever<C, S = ToolIndex<C>> {
    provider: Arc<dyn EmbeddingProvider>,
    store: S,
    known: RwLock<Arc<KnownTools<C>>>,
    sync_lock: tokio::sync::Mutex<()>,
}

impl<C: Capability> ToolRetriever<C> {
    /// Retriever over a fresh in-memory index.
    pub async fn in_memory(
        provider: Arc<dyn EmbeddingProvider>,
        definitions: impl IntoIterator<Item = ToolDefinition<C>>,
    ) -> Result<Self> {
        Self::new(provider, ToolIndex::new(), definitions).await
    }
}

impl<C: Capability, S: ToolStore<C>> ToolRetriever<C, S> {
    /// Syncs `store` with `definitions` and returns a ready retriever.
    pub async fn new(
        provider: Arc<dyn EmbeddingProvider>,
        store: S,
        definitions: impl IntoIterator<Item = ToolDefinition<C>>,
    ) -> Result<Self> {
        let definitions: Vec<Arc<ToolDefinition<C>>> =
            definitions.into_iter().map(Arc::new).collect();
        store.sync(&definitions, provider.as_ref()).await?;
        Ok(Self {
            provider,
            store,
            known: RwLock::new(Arc::new(known_tools(&definitions))),
            sync_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Replaces the tool set. On failure the previous tools stay in effect.
    ///
    /// Concurrent calls run one at a time, so the store and the known tools
    /// always end up holding the same set.
    pub async fn resync(
        &self,
        definitions: impl IntoIterator<Item = ToolDefinition<C>>,
    ) -> Result<SyncStats> {
        let definitions: Vec<Arc<ToolDefinition<C>>> =
            definitions.into_iter().map(Arc::new).collect();
        let _guard = self.sync_lock.lock().await;
        let stats = self.store.sync(&definitions, self.provider.as_ref()).await?;
        let mut guard = self.known.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(known_tools(&definitions));
        Ok(stats)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    #[must_use]
    pub fn tool(&self, name: &str) -> Option<Arc<ToolDefinition<C>>> {
        self.known_snapshot().get(name).cloned()
    }

    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.known_snapshot().len()
    }

    pub async fn retrieve(
        &self,
        query: &str,
        options: &RetrieveOptions,
    ) -> Result<ToolSelection<C>> {
        self.retrieve_batch(&[query], options)
            .await?
            .pop()
            .ok_or(RetrievalError::EmptyBatchResult)?
    }

    /// Retrieves tools for several queries with a single embedding call.
    pub async fn retrieve_batch<Q: AsRef<str>>(
        &self,
        queries: &[Q],
        options: &RetrieveOptions,
    ) -> Result<Vec<QueryOutcome<C>>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = queries.iter().map(|q| q.as_ref().to_string()).collect();
        let embeddings = self.provider.embed_batch(&texts).await?;
        if embeddings.len() != texts.len() {
            return Err(VectorStoreError::BatchMisaligned {
                expected: texts.len(),
                actual: embeddings.len(),
            }
            .into());
        }

        let known = self.known_snapshot();
        let mut outcomes = Vec::with_capacity(texts.len());
        for (query, embedding) in texts.iter().zip(&embeddings) {
            let hits = self
                .store
                .search(embedding, options.match_count, options.match_threshold)
                .await?;
            log::debug!("Query '{query}': {} semantic hits", hits.len());
            outcomes.push(merge_explicit(query, hits, &known, options));
        }
        Ok(outcomes)
    }

    fn known_snapshot(&self) -> Arc<KnownTools<C>> {
        let guard = self.known.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }
}

fn known_tools<C>(definitions: &[Arc<ToolDefinition<C>>]) -> KnownTools<C> {
    definitions
        .iter()
        .map(|definition| (definition.name.clone(), Arc::clone(definition)))
        .collect()
}

fn merge_explicit<C>(
    query: &str,
    hits: Vec<ToolMatch<C>>,
    known: &KnownTools<C>,
    options: &RetrieveOptions,
) -> QueryOutcome<C> {
    let mut selection = ToolSelection::new();
    for hit in hits {
        selection.insert_semantic(hit);
    }

    for name in extract_explicit_tools(query) {
        if let Some(definition) = known.get(&name) {
            selection.insert_explicit(Arc::clone(definition));
        } else if options.strict {
            return Err(RetrievalError::UnresolvedExplicitTool { name });
        } else {
            log::warn!("Explicitly requested tool '{name}' is not a known tool; skipping it");
            selection.mark_unresolved(name);
        }
    }
    Ok(selection)
}
