use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::{DictionaryError, DictionaryResult};
use crate::models::{
    CollectionStats, DictionaryEntry, DistanceMetric, EntryPoint, NewEntry, SearchHit,
    ServiceStatus,
};
use crate::repository::VectorRepository;
use crate::seed::SEED_ENTRIES;

/// Collection holding the dictionary points.
pub const COLLECTION_NAME: &str = "dicionario_pt";

/// Upper bound accepted for search limits.
pub const MAX_SEARCH_LIMIT: u64 = 50;

/// Retry policy for the startup connectivity probe.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
}

/// Service layer for the semantic dictionary.
///
/// Owns the lifecycle of the two external collaborators: the vector store
/// (behind [`VectorRepository`]) and the embedding model (behind
/// [`EmbeddingProvider`]). Constructed once at startup and shared by
/// reference with the request layer; `Ready` is terminal for the process
/// lifetime.
pub struct DictionaryService<R: VectorRepository> {
    repository: R,
    embedder: Arc<dyn EmbeddingProvider>,
    collection_name: String,
    retry: RetryPolicy,
    state: RwLock<LifecycleState>,
    /// Next point id to hand out. Seeded at initialization from a full scan
    /// of the collection, then incremented atomically so concurrent inserts
    /// never collide.
    next_id: AtomicU64,
}

impl<R: VectorRepository> DictionaryService<R> {
    pub fn new(repository: R, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_collection(repository, embedder, COLLECTION_NAME)
    }

    pub fn with_collection(
        repository: R,
        embedder: Arc<dyn EmbeddingProvider>,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            embedder,
            collection_name: collection_name.into(),
            retry: RetryPolicy::default(),
            state: RwLock::new(LifecycleState::Uninitialized),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub async fn is_ready(&self) -> bool {
        *self.state.read().await == LifecycleState::Ready
    }

    async fn ensure_ready(&self) -> DictionaryResult<()> {
        if self.is_ready().await {
            Ok(())
        } else {
            Err(DictionaryError::NotInitialized)
        }
    }

    /// Bring the service to `Ready`: probe the store with bounded retries,
    /// load the embedding model, ensure the collection exists (seeding it on
    /// first creation) and seed the id counter. No-op when already `Ready`;
    /// on failure the service returns to `Uninitialized`.
    pub async fn initialize(&self) -> DictionaryResult<()> {
        {
            let mut state = self.state.write().await;
            if *state == LifecycleState::Ready {
                return Ok(());
            }
            *state = LifecycleState::Initializing;
        }

        let result = self.initialize_inner().await;
        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                *state = LifecycleState::Ready;
                info!("Dictionary service initialized");
                Ok(())
            }
            Err(e) => {
                *state = LifecycleState::Uninitialized;
                Err(e)
            }
        }
    }

    async fn initialize_inner(&self) -> DictionaryResult<()> {
        self.connect_store().await?;
        self.embedder.load().await?;
        self.ensure_collection().await?;

        let max_id = self.repository.max_point_id(&self.collection_name).await?;
        self.next_id.store(max_id.unwrap_or(0) + 1, Ordering::SeqCst);
        Ok(())
    }

    /// Probe the store (list collections) until it answers, with a fixed
    /// delay between attempts. Exhausting the attempts is fatal to
    /// initialization.
    async fn connect_store(&self) -> DictionaryResult<()> {
        let mut last_error = String::new();
        for attempt in 1..=self.retry.max_attempts {
            match self.repository.list_collections().await {
                Ok(_) => {
                    info!("Connected to vector store (attempt {})", attempt);
                    return Ok(());
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < self.retry.max_attempts {
                        warn!(
                            "Waiting for vector store (attempt {}/{})",
                            attempt, self.retry.max_attempts
                        );
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
            }
        }

        Err(DictionaryError::Connection(format!(
            "vector store unreachable after {} attempts: {}",
            self.retry.max_attempts, last_error
        )))
    }

    /// Create and seed the collection if it does not exist. A pre-existing
    /// collection is reused as-is: no merge, no dedup, no schema check.
    async fn ensure_collection(&self) -> DictionaryResult<()> {
        if self.repository.collection_exists(&self.collection_name).await? {
            info!(
                "Collection '{}' already exists, reusing stored entries",
                self.collection_name
            );
            return Ok(());
        }

        info!("Creating collection '{}' with seed entries", self.collection_name);
        let entries: Vec<DictionaryEntry> = SEED_ENTRIES
            .iter()
            .map(|(word, definition)| DictionaryEntry::new(*word, *definition))
            .collect();
        let definitions: Vec<String> = entries.iter().map(|e| e.definition.clone()).collect();
        let vectors = self.embedder.embed_batch(&definitions).await?;

        self.repository
            .create_collection(
                &self.collection_name,
                self.embedder.dimension() as u64,
                DistanceMetric::Cosine,
            )
            .await?;

        let points: Vec<EntryPoint> = entries
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(i, (entry, vector))| EntryPoint {
                id: i as u64,
                vector,
                entry,
            })
            .collect();
        self.repository.upsert(&self.collection_name, points).await?;

        info!("Inserted {} seed entries", SEED_ENTRIES.len());
        Ok(())
    }

    /// Embed `query` and return the `limit` nearest entries, in the store's
    /// descending-score order. An empty collection yields an empty result.
    pub async fn search(&self, query: &str, limit: u64) -> DictionaryResult<Vec<SearchHit>> {
        self.ensure_ready().await?;

        if query.trim().is_empty() {
            return Err(DictionaryError::Validation(
                "query must not be empty".to_string(),
            ));
        }
        if limit == 0 || limit > MAX_SEARCH_LIMIT {
            return Err(DictionaryError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_SEARCH_LIMIT
            )));
        }

        let vector = self.embedder.embed(query).await?;
        self.repository
            .search(&self.collection_name, vector, limit)
            .await
    }

    /// Insert a new entry, embedding its definition. Ids come from the
    /// service-owned counter, so concurrent inserts receive distinct ids.
    /// Duplicate words are allowed and create separate entries.
    pub async fn add_word(&self, word: &str, definition: &str) -> DictionaryResult<NewEntry> {
        self.ensure_ready().await?;

        let vector = self.embedder.embed(definition).await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entry = DictionaryEntry::new(word, definition);

        self.repository
            .upsert(
                &self.collection_name,
                vec![EntryPoint {
                    id,
                    vector,
                    entry: entry.clone(),
                }],
            )
            .await?;

        info!(id, word = %entry.word, "Added dictionary entry");
        Ok(NewEntry { entry, id })
    }

    /// Report component health. By contract this never fails; a store probe
    /// failure is folded into the payload.
    pub async fn status(&self) -> ServiceStatus {
        let initialized = self.is_ready().await;
        let model_loaded = self.embedder.is_loaded();

        match self.repository.list_collections().await {
            Ok(collections) => ServiceStatus {
                status: "ok".to_string(),
                store_connected: true,
                collection_count: collections.len(),
                model_loaded,
                initialized,
                error: None,
            },
            Err(e) => ServiceStatus {
                status: "error".to_string(),
                store_connected: false,
                collection_count: 0,
                model_loaded,
                initialized,
                error: Some(e.to_string()),
            },
        }
    }

    /// Collection-level statistics. Store failures propagate; the HTTP
    /// boundary maps them to an error response.
    pub async fn statistics(&self) -> DictionaryResult<CollectionStats> {
        self.ensure_ready().await?;
        self.repository.collection_info(&self.collection_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::repository::MockVectorRepository;

    const DIM: usize = 4;

    fn mock_embedder() -> MockEmbeddingProvider {
        let mut embedder = MockEmbeddingProvider::new();
        embedder.expect_load().returning(|| Ok(()));
        embedder.expect_is_loaded().return_const(true);
        embedder.expect_dimension().return_const(DIM);
        embedder.expect_embed().returning(|_| Ok(vec![0.5; DIM]));
        embedder
            .expect_embed_batch()
            .returning(|texts| Ok(texts.iter().map(|_| vec![0.5; DIM]).collect()));
        embedder
    }

    fn existing_collection_repo(max_id: Option<u64>) -> MockVectorRepository {
        let mut repo = MockVectorRepository::new();
        repo.expect_list_collections()
            .returning(|| Ok(vec![COLLECTION_NAME.to_string()]));
        repo.expect_collection_exists().returning(|_| Ok(true));
        repo.expect_max_point_id().returning(move |_| Ok(max_id));
        repo
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            delay: Duration::ZERO,
        }
    }

    fn service(repo: MockVectorRepository) -> DictionaryService<MockVectorRepository> {
        DictionaryService::new(repo, Arc::new(mock_embedder())).with_retry_policy(fast_retry())
    }

    #[tokio::test]
    async fn test_search_before_initialize_fails() {
        let service = service(MockVectorRepository::new());
        let err = service.search("casa", 10).await.unwrap_err();
        assert!(matches!(err, DictionaryError::NotInitialized));
    }

    #[tokio::test]
    async fn test_add_word_before_initialize_fails() {
        let service = service(MockVectorRepository::new());
        let err = service.add_word("casa", "local").await.unwrap_err();
        assert!(matches!(err, DictionaryError::NotInitialized));
    }

    #[tokio::test]
    async fn test_statistics_before_initialize_fails() {
        let service = service(MockVectorRepository::new());
        let err = service.statistics().await.unwrap_err();
        assert!(matches!(err, DictionaryError::NotInitialized));
    }

    #[tokio::test]
    async fn test_initialize_is_noop_when_ready() {
        let mut repo = MockVectorRepository::new();
        repo.expect_list_collections()
            .times(1)
            .returning(|| Ok(vec![COLLECTION_NAME.to_string()]));
        repo.expect_collection_exists().times(1).returning(|_| Ok(true));
        repo.expect_max_point_id().times(1).returning(|_| Ok(Some(11)));
        let service = service(repo);

        service.initialize().await.unwrap();
        assert!(service.is_ready().await);
        // The second call must not touch the repository again.
        service.initialize().await.unwrap();
    }

    #[tokio::test]
    async fn test_initialize_seeds_new_collection() {
        let mut repo = MockVectorRepository::new();
        repo.expect_list_collections().returning(|| Ok(vec![]));
        repo.expect_collection_exists().returning(|_| Ok(false));
        repo.expect_create_collection()
            .withf(|collection, dimension, distance| {
                collection == COLLECTION_NAME
                    && *dimension == DIM as u64
                    && *distance == DistanceMetric::Cosine
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        repo.expect_upsert()
            .withf(|_, points| {
                points.len() == SEED_ENTRIES.len()
                    && points.iter().enumerate().all(|(i, p)| p.id == i as u64)
                    && points[3].entry.word == "casa"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        repo.expect_max_point_id()
            .returning(|_| Ok(Some(SEED_ENTRIES.len() as u64 - 1)));

        let service = service(repo);
        service.initialize().await.unwrap();
        assert!(service.is_ready().await);
    }

    #[tokio::test]
    async fn test_initialize_skips_seeding_when_collection_exists() {
        // No create_collection/upsert expectations: any call would panic.
        let service = service(existing_collection_repo(Some(11)));
        service.initialize().await.unwrap();
    }

    #[tokio::test]
    async fn test_initialize_fails_after_exhausting_retries() {
        let mut repo = MockVectorRepository::new();
        repo.expect_list_collections()
            .times(2)
            .returning(|| Err(DictionaryError::Store("connection refused".to_string())));

        let service = service(repo);
        let err = service.initialize().await.unwrap_err();
        assert!(matches!(err, DictionaryError::Connection(_)));
        assert!(err.to_string().contains("after 2 attempts"));

        // A failed initialization leaves the service unusable.
        assert!(!service.is_ready().await);
        assert!(matches!(
            service.search("casa", 10).await.unwrap_err(),
            DictionaryError::NotInitialized
        ));
    }

    #[tokio::test]
    async fn test_initialize_fails_when_model_load_fails() {
        let repo = existing_collection_repo(None);
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_load()
            .returning(|| Err(DictionaryError::Embedding("download failed".to_string())));

        let service = DictionaryService::new(repo, Arc::new(embedder)).with_retry_policy(fast_retry());
        let err = service.initialize().await.unwrap_err();
        assert!(matches!(err, DictionaryError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_add_word_on_empty_collection_assigns_id_1() {
        let mut repo = existing_collection_repo(None);
        repo.expect_upsert()
            .withf(|_, points| points.len() == 1 && points[0].id == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repo);
        service.initialize().await.unwrap();

        let added = service.add_word("cachorro", "animal doméstico").await.unwrap();
        assert_eq!(added.id, 1);
        assert_eq!(added.entry.word, "cachorro");
    }

    #[tokio::test]
    async fn test_add_word_continues_from_max_id() {
        let mut repo = existing_collection_repo(Some(11));
        repo.expect_upsert()
            .withf(|_, points| points[0].id == 12)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(repo);
        service.initialize().await.unwrap();

        let added = service.add_word("cachorro", "animal doméstico").await.unwrap();
        assert_eq!(added.id, 12);
    }

    #[tokio::test]
    async fn test_consecutive_adds_get_distinct_ids() {
        let mut repo = existing_collection_repo(None);
        repo.expect_upsert().times(3).returning(|_, _| Ok(()));

        let service = service(repo);
        service.initialize().await.unwrap();

        // Duplicate words are allowed; each insert gets its own id.
        let first = service.add_word("casa", "local onde alguém mora").await.unwrap();
        let second = service.add_word("casa", "moradia").await.unwrap();
        let third = service.add_word("lar", "residência").await.unwrap();
        assert_eq!((first.id, second.id, third.id), (1, 2, 3));
    }

    #[tokio::test]
    async fn test_search_preserves_store_order() {
        let mut repo = existing_collection_repo(Some(11));
        repo.expect_search()
            .withf(|collection, _, limit| collection == COLLECTION_NAME && *limit == 3)
            .returning(|_, _, _| {
                Ok(vec![
                    SearchHit {
                        entry: DictionaryEntry::new("casa", "local onde alguém mora"),
                        score: 0.91,
                    },
                    SearchHit {
                        entry: DictionaryEntry::new("lar", "local onde alguém mora"),
                        score: 0.88,
                    },
                ])
            });

        let service = service(repo);
        service.initialize().await.unwrap();

        let hits = service.search("onde morar", 3).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entry.word, "casa");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn test_search_on_empty_collection_returns_empty() {
        let mut repo = existing_collection_repo(None);
        repo.expect_search().returning(|_, _, _| Ok(vec![]));

        let service = service(repo);
        service.initialize().await.unwrap();

        let hits = service.search("qualquer coisa", 10).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_out_of_range_limits() {
        let service = service(existing_collection_repo(Some(11)));
        service.initialize().await.unwrap();

        assert!(matches!(
            service.search("casa", 0).await.unwrap_err(),
            DictionaryError::Validation(_)
        ));
        assert!(matches!(
            service.search("casa", MAX_SEARCH_LIMIT + 1).await.unwrap_err(),
            DictionaryError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_status_reports_ok() {
        let service = service(existing_collection_repo(Some(11)));
        service.initialize().await.unwrap();

        let status = service.status().await;
        assert_eq!(status.status, "ok");
        assert!(status.store_connected);
        assert_eq!(status.collection_count, 1);
        assert!(status.model_loaded);
        assert!(status.initialized);
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn test_status_never_fails_when_store_is_down() {
        let mut repo = MockVectorRepository::new();
        repo.expect_list_collections()
            .returning(|| Err(DictionaryError::Store("connection refused".to_string())));

        let service = service(repo);
        let status = service.status().await;
        assert_eq!(status.status, "error");
        assert!(!status.store_connected);
        assert_eq!(status.collection_count, 0);
        assert!(!status.initialized);
        assert!(status.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_statistics_returns_collection_info() {
        let mut repo = existing_collection_repo(Some(11));
        repo.expect_collection_info().returning(|collection| {
            Ok(CollectionStats {
                collection_name: collection.to_string(),
                total_entries: 12,
                vector_dimensions: DIM as u64,
                distance_metric: "Cosine".to_string(),
            })
        });

        let service = service(repo);
        service.initialize().await.unwrap();

        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.collection_name, COLLECTION_NAME);
        assert_eq!(stats.total_entries, 12);
        assert_eq!(stats.distance_metric, "Cosine");
    }

    #[tokio::test]
    async fn test_statistics_propagates_store_errors() {
        let mut repo = existing_collection_repo(Some(11));
        repo.expect_collection_info()
            .returning(|_| Err(DictionaryError::Store("timeout".to_string())));

        let service = service(repo);
        service.initialize().await.unwrap();

        assert!(matches!(
            service.statistics().await.unwrap_err(),
            DictionaryError::Store(_)
        ));
    }
}
