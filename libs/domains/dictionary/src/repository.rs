use async_trait::async_trait;

use crate::error::DictionaryResult;
use crate::models::{CollectionStats, DistanceMetric, EntryPoint, SearchHit};

/// Repository trait for vector storage operations
///
/// This trait abstracts the underlying vector database (Qdrant). It covers
/// exactly what the dictionary service needs: the connectivity probe,
/// collection bootstrap, inserts, nearest-neighbor search, the max-id scan
/// and collection introspection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorRepository: Send + Sync {
    /// List collection names. Doubles as the lightweight connectivity probe
    /// used during startup and by the status report.
    async fn list_collections(&self) -> DictionaryResult<Vec<String>>;

    /// Whether the named collection exists.
    async fn collection_exists(&self, collection: &str) -> DictionaryResult<bool>;

    /// Create a collection with the given vector size and distance metric.
    async fn create_collection(
        &self,
        collection: &str,
        dimension: u64,
        distance: DistanceMetric,
    ) -> DictionaryResult<()>;

    /// Insert points, overwriting any point with the same id.
    async fn upsert(&self, collection: &str, points: Vec<EntryPoint>) -> DictionaryResult<()>;

    /// Return the `limit` nearest entries to `vector`, ordered by
    /// descending similarity score.
    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> DictionaryResult<Vec<SearchHit>>;

    /// Scan every point and return the highest numeric id, or `None` for an
    /// empty collection.
    async fn max_point_id(&self, collection: &str) -> DictionaryResult<Option<u64>>;

    /// Collection introspection: point count, vector size, distance metric.
    async fn collection_info(&self, collection: &str) -> DictionaryResult<CollectionStats>;
}
