use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, VectorStoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Provider returning fixed vectors per text and recording every batch.
pub struct RecordingProvider {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
    batches: Mutex<Vec<Vec<String>>>,
    fail: AtomicBool,
}

impl RecordingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
            batches: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for RecordingProvider {
    fn id(&self) -> &str {
        "recording"
    }

    fn dimensions(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(VectorStoreError::EmbeddingError("model offline".to_string()));
        }
        self.batches.lock().unwrap().push(texts.to_vec());
        Ok(texts
            .iter()
            .map(|text| {
                self.vectors.get(text).cloned().unwrap_or_else(|| {
                    let mut v = vec![0.0; self.dimension];
                    v[0] = 1.0;
                    v
                })
            })
            .collect())
    }
}
