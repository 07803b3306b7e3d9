mod fastembed;
mod provider;

pub use fastembed::{EMBEDDING_DIM, FastEmbedProvider, MODEL_NAME};
pub use provider::EmbeddingProvider;

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
