use crate::error::{DictionaryError, DictionaryResult};

/// Qdrant connection configuration
///
/// The client speaks the gRPC protocol, so the default port is 6334
/// (Qdrant's REST port 6333 is not used here).
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl QdrantConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout_secs: 30,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn from_env() -> DictionaryResult<Self> {
        let host = std::env::var("QDRANT_HOST").unwrap_or_else(|_| "localhost".to_string());

        let port = std::env::var("QDRANT_PORT")
            .unwrap_or_else(|_| "6334".to_string())
            .parse()
            .map_err(|e| DictionaryError::Config(format!("invalid QDRANT_PORT: {}", e)))?;

        let timeout_secs = std::env::var("QDRANT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            timeout_secs,
        })
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6334,
            timeout_secs: 30,
        }
    }
}
