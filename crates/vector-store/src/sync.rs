use crate::document::render_tool_document;
use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, VectorStoreError};
use crate::fingerprint::{fingerprint, Fingerprint};
use crate::types::{IndexedTool, SyncStats};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use toolscope_protocol::{Capability, ToolDefinition};

/// Embeddings already known to a store, keyed by tool name.
pub(crate) type PriorEmbeddings<'a> = HashMap<&'a str, (&'a Fingerprint, &'a [f32])>;

pub(crate) struct Rebuilt<C> {
    pub entries: Vec<IndexedTool<C>>,
    pub stats: SyncStats,
}

/// Builds the next index contents without touching the current one.
///
/// A prior embedding is reused only when both the fingerprint and the vector
/// length match; everything else goes through a single batch call.
pub(crate) async fn rebuild_entries<C: Capability>(
    definitions: &[Arc<ToolDefinition<C>>],
    prior: &PriorEmbeddings<'_>,
    provider: &dyn EmbeddingProvider,
) -> Result<Rebuilt<C>> {
    let ordered = dedup_by_name(definitions);
    let dimension = provider.dimensions();

    let mut entries: Vec<IndexedTool<C>> = Vec::with_capacity(ordered.len());
    let mut slots: Vec<usize> = Vec::new();
    let mut texts: Vec<String> = Vec::new();

    for (idx, definition) in ordered.into_iter().enumerate() {
        let digest = fingerprint(&*definition);
        if let Some((prev_fp, prev_vec)) = prior.get(definition.name.as_str()) {
            if **prev_fp == digest && prev_vec.len() == dimension {
                log::debug!("Reusing embedding for tool '{}'", definition.name);
                entries.push(IndexedTool {
                    definition,
                    embedding: prev_vec.to_vec(),
                    fingerprint: digest,
                });
                continue;
            }
        }

        log::debug!("Scheduling tool '{}' for embedding", definition.name);
        slots.push(idx);
        texts.push(render_tool_document(&*definition));
        entries.push(IndexedTool {
            definition,
            embedding: Vec::new(),
            fingerprint: digest,
        });
    }

    let embedded = texts.len();
    if !texts.is_empty() {
        let vectors = provider.embed_batch(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(VectorStoreError::BatchMisaligned {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }
        for (slot, vector) in slots.into_iter().zip(vectors) {
            if vector.len() != dimension {
                return Err(VectorStoreError::InvalidDimension {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            entries[slot].embedding = vector;
        }
    }

    let live: HashSet<&str> = entries.iter().map(|e| e.definition.name.as_str()).collect();
    let removed = prior.keys().filter(|name| !live.contains(*name)).count();

    let stats = SyncStats {
        total: entries.len(),
        embedded,
        reused: entries.len() - embedded,
        removed,
    };
    Ok(Rebuilt { entries, stats })
}

/// Keeps one definition per name: the last one, at the first one's position.
fn dedup_by_name<C>(definitions: &[Arc<ToolDefinition<C>>]) -> Vec<Arc<ToolDefinition<C>>> {
    let mut ordered: Vec<Arc<ToolDefinition<C>>> = Vec::with_capacity(definitions.len());
    let mut position: HashMap<&str, usize> = HashMap::with_capacity(definitions.len());
    for definition in definitions {
        if let Some(&idx) = position.get(definition.name.as_str()) {
            log::warn!(
                "Duplicate tool name '{}' in sync input; keeping the last definition",
                definition.name
            );
            ordered[idx] = Arc::clone(definition);
        } else {
            position.insert(definition.name.as_str(), ordered.len());
            ordered.push(Arc::clone(definition));
        }
    }
    ordered
}
