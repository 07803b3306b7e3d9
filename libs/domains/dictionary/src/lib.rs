//! Dictionary Domain Library
//!
//! Semantic search over (word, definition) pairs, wrapping a Qdrant
//! collection with local embedding generation.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │ DictionaryService │  ← lifecycle, seeding, id assignment
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼────────┐     ┌──────────────────┐
//! │ VectorRepository │     │ EmbeddingProvider │
//! │     (trait)      │     │      (trait)      │
//! └─────────┬────────┘     └─────────┬────────┘
//!           │                        │
//! ┌─────────▼────────┐     ┌─────────▼────────┐
//! │ QdrantRepository │     │ FastEmbedProvider │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! The service owns a three-phase startup (store probe with bounded retries,
//! model load, collection bootstrap with seed data) and exposes four
//! operations: search, add-word, status and statistics. HTTP handlers for
//! those operations live in [`handlers`].

pub mod embedding;
pub mod error;
pub mod handlers;
pub mod models;
pub mod qdrant;
pub mod repository;
pub mod seed;
pub mod service;

// Re-export commonly used types
pub use embedding::{EmbeddingProvider, FastEmbedProvider};
pub use error::{DictionaryError, DictionaryResult};
pub use models::{
    CollectionStats, DictionaryEntry, DistanceMetric, EntryPoint, NewEntry, SearchHit,
    ServiceStatus,
};
pub use qdrant::{QdrantConfig, QdrantRepository};
pub use repository::VectorRepository;
pub use service::{COLLECTION_NAME, DictionaryService, RetryPolicy};
