//! HTTP handlers for the dictionary endpoints.
//!
//! Pure request/response mapping: validate the body, call the service,
//! serialize the result. Service errors convert to HTTP responses through
//! `DictionaryError → AppError`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{InternalServerErrorResponse, ValidationErrorResponse},
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use validator::Validate;

use crate::error::DictionaryResult;
use crate::models::{CollectionStats, DictionaryEntry, SearchHit, ServiceStatus};
use crate::repository::VectorRepository;
use crate::service::DictionaryService;

// ===== Request/Response DTOs =====

fn default_limit() -> u64 {
    10
}

/// Request body for semantic search.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BuscaRequest {
    /// Free text to search for
    #[validate(length(min = 1, max = 200))]
    pub query: String,
    /// Maximum number of results
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: u64,
}

/// Request body for adding a new word.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PalavraRequest {
    #[validate(length(min = 1, max = 100))]
    pub palavra: String,
    #[validate(length(min = 1, max = 500))]
    pub definicao: String,
}

/// Search response: the original query plus scored entries.
#[derive(Debug, Serialize, ToSchema)]
pub struct BuscaResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// Confirmation returned after a word is added.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdicionarResponse {
    pub message: String,
    pub palavra: String,
    pub definicao: String,
    pub id: u64,
}

/// OpenAPI documentation for the dictionary API
#[derive(OpenApi)]
#[openapi(
    paths(status, estatisticas, buscar, adicionar),
    components(
        schemas(
            BuscaRequest,
            BuscaResponse,
            PalavraRequest,
            AdicionarResponse,
            SearchHit,
            DictionaryEntry,
            ServiceStatus,
            CollectionStats
        ),
        responses(ValidationErrorResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "busca", description = "Semantic search over the dictionary"),
        (name = "gestao", description = "Dictionary management"),
        (name = "sistema", description = "Health and statistics")
    )
)]
pub struct ApiDoc;

/// Create the dictionary router with all HTTP endpoints
pub fn router<R: VectorRepository + 'static>(service: Arc<DictionaryService<R>>) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/estatisticas", get(estatisticas))
        .route("/buscar", post(buscar))
        .route("/adicionar", post(adicionar))
        .with_state(service)
}

/// Component health report
#[utoipa::path(
    get,
    path = "/status",
    tag = "sistema",
    responses(
        (status = 200, description = "Component status, degraded or not", body = ServiceStatus)
    )
)]
async fn status<R: VectorRepository>(
    State(service): State<Arc<DictionaryService<R>>>,
) -> Json<ServiceStatus> {
    Json(service.status().await)
}

/// Collection statistics
#[utoipa::path(
    get,
    path = "/estatisticas",
    tag = "sistema",
    responses(
        (status = 200, description = "Collection statistics", body = CollectionStats),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn estatisticas<R: VectorRepository>(
    State(service): State<Arc<DictionaryService<R>>>,
) -> DictionaryResult<Json<CollectionStats>> {
    let stats = service.statistics().await?;
    Ok(Json(stats))
}

/// Semantic search for similar words
#[utoipa::path(
    post,
    path = "/buscar",
    tag = "busca",
    request_body = BuscaRequest,
    responses(
        (status = 200, description = "Entries ordered by descending similarity", body = BuscaResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn buscar<R: VectorRepository>(
    State(service): State<Arc<DictionaryService<R>>>,
    ValidatedJson(request): ValidatedJson<BuscaRequest>,
) -> DictionaryResult<Json<BuscaResponse>> {
    let results = service.search(&request.query, request.limit).await?;
    Ok(Json(BuscaResponse {
        query: request.query,
        results,
    }))
}

/// Add a new word with its definition
#[utoipa::path(
    post,
    path = "/adicionar",
    tag = "gestao",
    request_body = PalavraRequest,
    responses(
        (status = 201, description = "Word added", body = AdicionarResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn adicionar<R: VectorRepository>(
    State(service): State<Arc<DictionaryService<R>>>,
    ValidatedJson(request): ValidatedJson<PalavraRequest>,
) -> DictionaryResult<impl IntoResponse> {
    let added = service.add_word(&request.palavra, &request.definicao).await?;

    Ok((
        StatusCode::CREATED,
        Json(AdicionarResponse {
            message: "Palavra adicionada com sucesso".to_string(),
            palavra: added.entry.word,
            definicao: added.entry.definition,
            id: added.id,
        }),
    ))
}
