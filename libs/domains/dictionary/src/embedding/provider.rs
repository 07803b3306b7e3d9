use async_trait::async_trait;

use crate::error::DictionaryResult;

/// Trait for embedding generation providers
///
/// The service treats the model as a black box with a stable output
/// dimensionality; implementations own weight loading and inference.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, e.g. `paraphrase-multilingual-MiniLM-L12-v2`.
    fn model_name(&self) -> &'static str;

    /// Dimension of the vectors produced by this provider.
    fn dimension(&self) -> usize;

    /// Whether the model weights are resident in memory.
    fn is_loaded(&self) -> bool;

    /// Load the model weights. Idempotent; there is no fallback model, so a
    /// failure here is fatal to service initialization.
    async fn load(&self) -> DictionaryResult<()>;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> DictionaryResult<Vec<f32>>;

    /// Generate embeddings for multiple texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> DictionaryResult<Vec<Vec<f32>>>;
}
