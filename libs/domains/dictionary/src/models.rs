use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored word/definition pair.
///
/// The wire and payload keys are the service's public Portuguese surface;
/// the Rust field names stay English like the rest of the codebase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DictionaryEntry {
    #[serde(rename = "palavra")]
    pub word: String,
    #[serde(rename = "definicao")]
    pub definition: String,
}

impl DictionaryEntry {
    pub fn new(word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
        }
    }
}

/// A point ready for insertion: id, embedding vector and entry payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub entry: DictionaryEntry,
}

/// A single search result with the store's native similarity score.
///
/// Scores are cosine similarities as reported by the store, expected in
/// `[0, 1]` but not clamped locally.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchHit {
    pub entry: DictionaryEntry,
    pub score: f32,
}

/// A freshly inserted entry and its assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub entry: DictionaryEntry,
    pub id: u64,
}

/// Distance metric configured on a collection.
///
/// This service always creates collections with `Cosine`; the other
/// variants only appear when statistics are read from a pre-existing
/// collection created elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Euclidean,
    DotProduct,
    Manhattan,
}

impl DistanceMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "Cosine",
            DistanceMetric::Euclidean => "Euclid",
            DistanceMetric::DotProduct => "Dot",
            DistanceMetric::Manhattan => "Manhattan",
        }
    }
}

/// Collection statistics as exposed by the statistics endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectionStats {
    pub collection_name: String,
    pub total_entries: u64,
    pub vector_dimensions: u64,
    pub distance_metric: String,
}

/// Component health report.
///
/// Produced by `DictionaryService::status()`, which by contract never
/// fails: a store probe failure is folded into the payload instead.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub status: String,
    pub store_connected: bool,
    pub collection_count: usize,
    pub model_loaded: bool,
    pub initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_with_portuguese_keys() {
        let entry = DictionaryEntry::new("casa", "local onde alguém mora");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["palavra"], "casa");
        assert_eq!(value["definicao"], "local onde alguém mora");
    }

    #[test]
    fn test_entry_round_trip() {
        let entry = DictionaryEntry::new("lar", "local onde alguém mora");
        let json = serde_json::to_string(&entry).unwrap();
        let back: DictionaryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_status_skips_absent_error_field() {
        let status = ServiceStatus {
            status: "ok".to_string(),
            store_connected: true,
            collection_count: 1,
            model_loaded: true,
            initialized: true,
            error: None,
        };
        let value = serde_json::to_value(&status).unwrap();
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_distance_metric_names() {
        assert_eq!(DistanceMetric::Cosine.as_str(), "Cosine");
        assert_eq!(DistanceMetric::default(), DistanceMetric::Cosine);
    }
}
