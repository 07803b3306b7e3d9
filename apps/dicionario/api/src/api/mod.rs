use std::sync::Arc;

use axum::{Json, Router, routing::get};
use domain_dictionary::{DictionaryService, VectorRepository, handlers};
use serde_json::{Value, json};

/// Creates the full API route set: the root info endpoint plus the
/// dictionary endpoints from the domain router. All routes carry their own
/// state, so the result composes cleanly with cross-cutting middleware.
pub fn routes<R: VectorRepository + 'static>(service: Arc<DictionaryService<R>>) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(handlers::router(service))
}

/// Root endpoint: API identity and endpoint map.
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Dicionário Vetorial API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "API para busca semântica usando embeddings",
        "endpoints": {
            "buscar": "/buscar - Busca semântica de palavras",
            "adicionar": "/adicionar - Adiciona nova palavra",
            "status": "/status - Status dos serviços",
            "estatisticas": "/estatisticas - Estatísticas da coleção"
        },
        "documentacao": {
            "swagger": "/swagger-ui",
            "redoc": "/redoc"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_root_lists_all_endpoints() {
        let Json(body) = root().await;
        assert_eq!(body["message"], "Dicionário Vetorial API");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        for endpoint in ["buscar", "adicionar", "status", "estatisticas"] {
            assert!(body["endpoints"][endpoint].is_string(), "missing {}", endpoint);
        }
    }
}
