use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tokio::sync::OnceCell;
use tracing::info;

use super::EmbeddingProvider;
use crate::error::{DictionaryError, DictionaryResult};

/// The fixed multilingual model used for every stored vector and every
/// query. Changing it would invalidate existing collections.
pub const MODEL_NAME: &str = "paraphrase-multilingual-MiniLM-L12-v2";

/// Output dimensionality of [`MODEL_NAME`].
pub const EMBEDDING_DIM: usize = 384;

/// Local embedding provider backed by fastembed (ONNX runtime).
///
/// Construction is cheap; the model weights are fetched and loaded on
/// [`EmbeddingProvider::load`]. Inference is CPU-bound and runs on the
/// blocking thread pool.
pub struct FastEmbedProvider {
    model: OnceCell<Arc<Mutex<TextEmbedding>>>,
}

impl FastEmbedProvider {
    pub fn new() -> Self {
        Self {
            model: OnceCell::new(),
        }
    }

    fn loaded_model(&self) -> DictionaryResult<Arc<Mutex<TextEmbedding>>> {
        self.model
            .get()
            .cloned()
            .ok_or_else(|| DictionaryError::Embedding("embedding model is not loaded".to_string()))
    }

    async fn run_embed(&self, texts: Vec<String>) -> DictionaryResult<Vec<Vec<f32>>> {
        let model = self.loaded_model()?;
        tokio::task::spawn_blocking(move || {
            let mut guard = model.lock().map_err(|_| {
                DictionaryError::Embedding("embedding model lock poisoned".to_string())
            })?;
            guard
                .embed(texts, None)
                .map_err(|e| DictionaryError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| DictionaryError::Embedding(format!("embedding task failed: {}", e)))?
    }
}

impl Default for FastEmbedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    fn model_name(&self) -> &'static str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    async fn load(&self) -> DictionaryResult<()> {
        self.model
            .get_or_try_init(|| async {
                info!("Loading embedding model {}", MODEL_NAME);
                let model = tokio::task::spawn_blocking(|| {
                    TextEmbedding::try_new(
                        InitOptions::new(EmbeddingModel::ParaphraseMLMiniLML12V2)
                            .with_show_download_progress(false),
                    )
                })
                .await
                .map_err(|e| {
                    DictionaryError::Embedding(format!("model load task failed: {}", e))
                })?
                .map_err(|e| DictionaryError::Embedding(e.to_string()))?;
                info!("Embedding model loaded ({} dimensions)", EMBEDDING_DIM);
                Ok(Arc::new(Mutex::new(model)))
            })
            .await
            .map(|_| ())
    }

    async fn embed(&self, text: &str) -> DictionaryResult<Vec<f32>> {
        let mut vectors = self.run_embed(vec![text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| DictionaryError::Embedding("model returned no embedding".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> DictionaryResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.run_embed(texts.to_vec()).await
    }
}
