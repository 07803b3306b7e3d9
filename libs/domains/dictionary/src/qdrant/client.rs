use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, CreateCollectionBuilder, Distance, PointId, PointStruct, ScrollPointsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
    point_id::PointIdOptions, value::Kind,
};

use super::QdrantConfig;
use crate::error::{DictionaryError, DictionaryResult};
use crate::models::{CollectionStats, DictionaryEntry, DistanceMetric, EntryPoint, SearchHit};
use crate::repository::VectorRepository;

/// Points scanned per page when looking for the maximum id.
const SCROLL_PAGE_SIZE: u32 = 1000;

/// Qdrant-backed implementation of VectorRepository
pub struct QdrantRepository {
    client: Qdrant,
}

impl QdrantRepository {
    /// Build the client. This does not open a connection; the service's
    /// startup probe is the first round-trip.
    pub async fn new(config: QdrantConfig) -> DictionaryResult<Self> {
        let client = Qdrant::from_url(&config.url())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DictionaryError::Connection(format!("failed to build client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn to_qdrant_distance(metric: DistanceMetric) -> Distance {
        match metric {
            DistanceMetric::Cosine => Distance::Cosine,
            DistanceMetric::Euclidean => Distance::Euclid,
            DistanceMetric::DotProduct => Distance::Dot,
            DistanceMetric::Manhattan => Distance::Manhattan,
        }
    }

    fn from_qdrant_distance(distance: Distance) -> DistanceMetric {
        match distance {
            Distance::Cosine => DistanceMetric::Cosine,
            Distance::Euclid => DistanceMetric::Euclidean,
            Distance::Dot => DistanceMetric::DotProduct,
            Distance::Manhattan => DistanceMetric::Manhattan,
            _ => DistanceMetric::Cosine,
        }
    }

    fn entry_to_payload(entry: &DictionaryEntry) -> HashMap<String, QdrantValue> {
        let mut payload = HashMap::new();
        payload.insert("palavra".to_string(), QdrantValue::from(entry.word.clone()));
        payload.insert(
            "definicao".to_string(),
            QdrantValue::from(entry.definition.clone()),
        );
        payload
    }

    fn payload_to_entry(payload: &HashMap<String, QdrantValue>) -> DictionaryResult<DictionaryEntry> {
        let word = Self::string_field(payload, "palavra")?;
        let definition = Self::string_field(payload, "definicao")?;
        Ok(DictionaryEntry { word, definition })
    }

    fn string_field(payload: &HashMap<String, QdrantValue>, key: &str) -> DictionaryResult<String> {
        match payload.get(key).and_then(|v| v.kind.as_ref()) {
            Some(Kind::StringValue(s)) => Ok(s.clone()),
            _ => Err(DictionaryError::Internal(format!(
                "point payload missing string field '{}'",
                key
            ))),
        }
    }

    fn numeric_point_id(id: Option<&PointId>) -> Option<u64> {
        match id.and_then(|id| id.point_id_options.as_ref()) {
            Some(PointIdOptions::Num(n)) => Some(*n),
            _ => None,
        }
    }

    fn extract_vector_params(config: Option<&qdrant::CollectionConfig>) -> (u64, DistanceMetric) {
        let vectors_config = config
            .and_then(|c| c.params.as_ref())
            .and_then(|p| p.vectors_config.as_ref())
            .and_then(|vc| vc.config.as_ref());

        match vectors_config {
            Some(qdrant::vectors_config::Config::Params(p)) => {
                (p.size, Self::from_qdrant_distance(p.distance()))
            }
            // Multi-vector collections are not created by this service;
            // report the first configured vector if one shows up anyway.
            Some(qdrant::vectors_config::Config::ParamsMap(map)) => map
                .map
                .values()
                .next()
                .map(|p| (p.size, Self::from_qdrant_distance(p.distance())))
                .unwrap_or((0, DistanceMetric::Cosine)),
            None => (0, DistanceMetric::Cosine),
        }
    }
}

#[async_trait]
impl VectorRepository for QdrantRepository {
    async fn list_collections(&self) -> DictionaryResult<Vec<String>> {
        let response = self.client.list_collections().await?;
        Ok(response
            .collections
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    async fn collection_exists(&self, collection: &str) -> DictionaryResult<bool> {
        Ok(self.client.collection_exists(collection).await?)
    }

    async fn create_collection(
        &self,
        collection: &str,
        dimension: u64,
        distance: DistanceMetric,
    ) -> DictionaryResult<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection).vectors_config(VectorParamsBuilder::new(
                    dimension,
                    Self::to_qdrant_distance(distance),
                )),
            )
            .await?;
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<EntryPoint>) -> DictionaryResult<()> {
        let points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| PointStruct::new(p.id, p.vector, Self::entry_to_payload(&p.entry)))
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await?;
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> DictionaryResult<Vec<SearchHit>> {
        let response = self
            .client
            .search_points(SearchPointsBuilder::new(collection, vector, limit).with_payload(true))
            .await?;

        response
            .result
            .into_iter()
            .map(|point| {
                let entry = Self::payload_to_entry(&point.payload)?;
                Ok(SearchHit {
                    entry,
                    score: point.score,
                })
            })
            .collect()
    }

    async fn max_point_id(&self, collection: &str) -> DictionaryResult<Option<u64>> {
        let mut max_id: Option<u64> = None;
        let mut offset: Option<PointId> = None;

        loop {
            let mut builder = ScrollPointsBuilder::new(collection)
                .limit(SCROLL_PAGE_SIZE)
                .with_payload(false)
                .with_vectors(false);
            if let Some(o) = offset.take() {
                builder = builder.offset(o);
            }

            let response = self.client.scroll(builder).await?;
            for point in &response.result {
                if let Some(n) = Self::numeric_point_id(point.id.as_ref()) {
                    max_id = Some(max_id.map_or(n, |m| m.max(n)));
                }
            }

            match response.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(max_id)
    }

    async fn collection_info(&self, collection: &str) -> DictionaryResult<CollectionStats> {
        let response = self.client.collection_info(collection).await?;
        let info = response
            .result
            .ok_or_else(|| DictionaryError::Internal("collection info missing result".to_string()))?;

        let (dimension, distance) = Self::extract_vector_params(info.config.as_ref());

        Ok(CollectionStats {
            collection_name: collection.to_string(),
            total_entries: info.points_count.unwrap_or(0),
            vector_dimensions: dimension,
            distance_metric: distance.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_payload_round_trip() {
        let entry = DictionaryEntry::new("cachorro", "animal doméstico quadrúpede");
        let payload = QdrantRepository::entry_to_payload(&entry);
        let back = QdrantRepository::payload_to_entry(&payload).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_payload_missing_field_is_an_error() {
        let mut payload = HashMap::new();
        payload.insert("palavra".to_string(), QdrantValue::from("casa".to_string()));
        let err = QdrantRepository::payload_to_entry(&payload).unwrap_err();
        assert!(err.to_string().contains("definicao"));
    }

    #[test]
    fn test_payload_non_string_field_is_an_error() {
        let mut payload = HashMap::new();
        payload.insert("palavra".to_string(), QdrantValue::from(42));
        payload.insert("definicao".to_string(), QdrantValue::from("x".to_string()));
        assert!(QdrantRepository::payload_to_entry(&payload).is_err());
    }

    #[test]
    fn test_numeric_point_id() {
        let id = PointId::from(7u64);
        assert_eq!(QdrantRepository::numeric_point_id(Some(&id)), Some(7));

        let uuid_id = PointId::from("not-a-number".to_string());
        assert_eq!(QdrantRepository::numeric_point_id(Some(&uuid_id)), None);

        assert_eq!(QdrantRepository::numeric_point_id(None), None);
    }

    #[test]
    fn test_distance_mapping_round_trip() {
        for metric in [
            DistanceMetric::Cosine,
            DistanceMetric::Euclidean,
            DistanceMetric::DotProduct,
            DistanceMetric::Manhattan,
        ] {
            let qdrant_distance = QdrantRepository::to_qdrant_distance(metric);
            assert_eq!(QdrantRepository::from_qdrant_distance(qdrant_distance), metric);
        }
    }
}
