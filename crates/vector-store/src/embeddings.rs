use crate::error::{Result, VectorStoreError};
use async_trait::async_trait;
use unicode_segmentation::UnicodeSegmentation;

/// Converts text into fixed-dimension vectors.
///
/// Implementations must return exactly one vector per input text, in input
/// order, each of length [`dimensions`](Self::dimensions). The caller owns
/// the provider; there is no process-wide instance.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Stable identifier of the model behind this provider.
    ///
    /// Persistent stores refuse to reuse vectors produced under another id.
    fn id(&self) -> &str;

    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| VectorStoreError::EmbeddingError("Empty embedding result".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Releases model resources. Further calls after `dispose` may fail.
    async fn dispose(&self) -> Result<()> {
        Ok(())
    }
}

/// Deterministic bag-of-words embedder.
///
/// Lower-cased Unicode words are feature-hashed into `dimensions` signed
/// buckets and the result is L2-normalized, so texts sharing vocabulary score
/// high under cosine similarity. Needs no model assets.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    id: String,
    dimension: usize,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMENSION: usize = 384;

    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(VectorStoreError::Other(
                "HashingEmbedder dimension must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            id: format!("hashing-{dimension}"),
            dimension,
        })
    }

    #[must_use]
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimension];
        for word in text.unicode_words() {
            let token = word.to_lowercase();
            let mut state = fnv1a_64(token.as_bytes());
            let bits = splitmix64(&mut state);
            #[allow(clippy::cast_possible_truncation)]
            let bucket = (bits % self.dimension as u64) as usize;
            let sign = if bits >> 63 == 0 { 1.0 } else { -1.0 };
            vec[bucket] += sign;
        }
        normalize(&mut vec);
        vec
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            id: format!("hashing-{}", Self::DEFAULT_DIMENSION),
            dimension: Self::DEFAULT_DIMENSION,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dimensions(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[test]
    fn rejects_zero_dimension() {
        assert!(HashingEmbedder::new(0).is_err());
    }

    #[test]
    fn hashing_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let a = embedder.embed_text("Get the current weather");
        let b = embedder.embed_text("Get the current weather");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn case_is_ignored() {
        let embedder = HashingEmbedder::default();
        assert_eq!(embedder.embed_text("Weather"), embedder.embed_text("weather"));
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(8).unwrap();
        assert!(embedder.embed_text("  ").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn shared_words_score_higher() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed_text("what is the weather forecast");
        let weather = embedder.embed_text("getWeather: weather forecast for a city");
        let email = embedder.embed_text("sendEmail: deliver mail over smtp");
        assert!(
            cosine_similarity(&query, &weather) > cosine_similarity(&query, &email),
            "weather document should rank above email"
        );
    }

    #[tokio::test]
    async fn batch_preserves_order() {
        let embedder = HashingEmbedder::new(32).unwrap();
        let texts = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
        let batch = embedder.embed_batch(&texts).await.unwrap();
        assert_eq!(batch.len(), 3);
        for (text, vector) in texts.iter().zip(&batch) {
            assert_eq!(vector, &embedder.embed_text(text));
        }
        assert_eq!(embedder.embed("beta").await.unwrap(), batch[1]);
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
    }
}
