use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, VectorStoreError};
use crate::fingerprint::Fingerprint;
use crate::store::ToolStore;
use crate::sync::{rebuild_entries, PriorEmbeddings};
use crate::tool_index::ToolIndex;
use crate::types::{IndexedTool, SyncStats, ToolMatch};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use toolscope_protocol::{Capability, ToolDefinition};

pub const TOOL_STORE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStoreMeta {
    pub provider_id: String,
    pub dimension: usize,
}

impl ToolStoreMeta {
    #[must_use]
    pub fn for_provider(provider: &dyn EmbeddingProvider) -> Self {
        Self {
            provider_id: provider.id().to_string(),
            dimension: provider.dimensions(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedToolStore {
    schema_version: u32,
    meta: ToolStoreMeta,
    tools: Vec<PersistedTool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedTool {
    name: String,
    fingerprint: Fingerprint,
    vector: Vec<f32>,
}

/// Tool store that keeps embeddings in a JSON file between runs.
///
/// Only `(name, fingerprint, vector)` triples are written; definitions come
/// from each `sync`. A fresh process therefore re-embeds just the tools that
/// changed since the file was written.
pub struct JsonToolStore<C> {
    path: PathBuf,
    meta: ToolStoreMeta,
    records: tokio::sync::Mutex<Vec<PersistedTool>>,
    index: ToolIndex<C>,
}

impl<C: Capability> JsonToolStore<C> {
    /// Opens the store at `path`, reusing its vectors when they were
    /// produced by the same provider id and dimension.
    pub async fn open(path: impl AsRef<Path>, meta: ToolStoreMeta) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        log::info!("Opening tool store at {}", path.display());
        let records = load_persisted_if_compatible(&path, &meta)
            .await?
            .map(|store| store.tools)
            .unwrap_or_default();
        log::debug!("Loaded {} persisted tool embeddings", records.len());

        Ok(Self {
            path,
            meta,
            records: tokio::sync::Mutex::new(records),
            index: ToolIndex::new(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn meta(&self) -> &ToolStoreMeta {
        &self.meta
    }

    /// Number of embeddings currently on disk.
    pub async fn persisted_len(&self) -> usize {
        self.records.lock().await.len()
    }

    async fn write(&self, tools: Vec<PersistedTool>) -> Result<Vec<PersistedTool>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let persisted = PersistedToolStore {
            schema_version: TOOL_STORE_SCHEMA_VERSION,
            meta: self.meta.clone(),
            tools,
        };
        let data = serde_json::to_vec_pretty(&persisted)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(persisted.tools)
    }
}

#[async_trait]
impl<C: Capability> ToolStore<C> for JsonToolStore<C> {
    async fn sync(
        &self,
        definitions: &[Arc<ToolDefinition<C>>],
        provider: &dyn EmbeddingProvider,
    ) -> Result<SyncStats> {
        if provider.id() != self.meta.provider_id || provider.dimensions() != self.meta.dimension
        {
            return Err(VectorStoreError::Other(format!(
                "Tool store at {} belongs to provider {} ({} dims), got {} ({} dims)",
                self.path.display(),
                self.meta.provider_id,
                self.meta.dimension,
                provider.id(),
                provider.dimensions()
            )));
        }

        let mut records = self.records.lock().await;
        let rebuilt = {
            let prior: PriorEmbeddings<'_> = records
                .iter()
                .map(|tool| {
                    (
                        tool.name.as_str(),
                        (&tool.fingerprint, tool.vector.as_slice()),
                    )
                })
                .collect();
            rebuild_entries(definitions, &prior, provider).await?
        };

        let next: Vec<PersistedTool> = rebuilt.entries.iter().map(persisted_from).collect();
        *records = self.write(next).await?;
        self.index.replace(rebuilt.entries);

        let stats = rebuilt.stats;
        log::info!(
            "Tool store {} synced: {} tools ({} embedded, {} reused, {} removed)",
            self.path.display(),
            stats.total,
            stats.embedded,
            stats.reused,
            stats.removed
        );
        Ok(stats)
    }

    async fn search(
        &self,
        query: &[f32],
        count: usize,
        threshold: f32,
    ) -> Result<Vec<ToolMatch<C>>> {
        Ok(self.index.rank(query, count, threshold))
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}

fn persisted_from<C>(entry: &IndexedTool<C>) -> PersistedTool {
    PersistedTool {
        name: entry.definition.name.clone(),
        fingerprint: entry.fingerprint.clone(),
        vector: entry.embedding.clone(),
    }
}

async fn load_persisted_if_compatible(
    path: &Path,
    desired: &ToolStoreMeta,
) -> Result<Option<PersistedToolStore>> {
    if !path.exists() {
        return Ok(None);
    }

    let bytes = tokio::fs::read(path).await?;
    let persisted: PersistedToolStore = match serde_json::from_slice(&bytes) {
        Ok(persisted) => persisted,
        Err(err) => {
            log::warn!("Ignoring unreadable tool store {}: {err}", path.display());
            return Ok(None);
        }
    };
    if persisted.schema_version != TOOL_STORE_SCHEMA_VERSION {
        log::warn!(
            "Ignoring tool store {} with schema_version {} (expected {TOOL_STORE_SCHEMA_VERSION})",
            path.display(),
            persisted.schema_version
        );
        return Ok(None);
    }
    if &persisted.meta != desired {
        log::warn!(
            "Ignoring tool store {} built by {} ({} dims); current provider is {} ({} dims)",
            path.display(),
            persisted.meta.provider_id,
            persisted.meta.dimension,
            desired.provider_id,
            desired.dimension
        );
        return Ok(None);
    }

    Ok(Some(persisted))
}
