use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

pub type DictionaryResult<T> = Result<T, DictionaryError>;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Dictionary service is not initialized")]
    NotInitialized,

    #[error("Vector store connection failed: {0}")]
    Connection(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<qdrant_client::QdrantError> for DictionaryError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        DictionaryError::Store(err.to_string())
    }
}

/// Convert DictionaryError to AppError for standardized HTTP error responses
impl From<DictionaryError> for AppError {
    fn from(err: DictionaryError) -> Self {
        match err {
            DictionaryError::NotInitialized => {
                AppError::InternalServerError("Dictionary service is not initialized".to_string())
            }
            DictionaryError::Connection(msg) => {
                AppError::ServiceUnavailable(format!("Vector store connection failed: {}", msg))
            }
            DictionaryError::Store(msg) => {
                AppError::InternalServerError(format!("Vector store error: {}", msg))
            }
            DictionaryError::Embedding(msg) => {
                AppError::InternalServerError(format!("Embedding error: {}", msg))
            }
            DictionaryError::Validation(msg) => AppError::UnprocessableEntity(msg),
            DictionaryError::Config(msg) => {
                AppError::InternalServerError(format!("Configuration error: {}", msg))
            }
            DictionaryError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for DictionaryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
