//! Dicionário Vetorial API
//!
//! REST API for semantic dictionary search backed by embeddings and Qdrant.
//!
//! ## Architecture
//!
//! ```text
//! Client (JSON over HTTP)
//!   ↓
//! axum handlers (domain_dictionary::handlers)
//!   ↓
//! DictionaryService (domain layer)
//!   ↓
//! ┌──────────────────┬───────────────────┐
//! │ QdrantRepository │ FastEmbedProvider │
//! └──────────────────┴───────────────────┘
//!   ↓                    ↓
//! Qdrant             ONNX model (local)
//! ```
//!
//! ## Endpoints
//!
//! - `POST /buscar` — semantic search
//! - `POST /adicionar` — add a word
//! - `GET /status` — component health
//! - `GET /estatisticas` — collection statistics
//! - `GET /` — API info, `GET /health` — liveness
//!
//! ## Modules
//!
//! - `server`: startup wiring and lifecycle
//! - `api`: route composition and the root info endpoint
//! - `config`: environment configuration

pub mod api;
pub mod config;
pub mod server;

// Re-export for convenience
pub use server::run;
