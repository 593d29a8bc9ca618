// ============================================================
// Layer 1 — HTTP Presentation Layer
// ============================================================
// A small JSON API over the similarity service:
//
//   POST /similar_words   {"word": "main", "k": 5}
//        200 → {"similar_words": ["init_app", ...], "scores": [0.91, ...]}
//        422 → {"detail": "..."}   empty or numeric-only word
//        404 → {"detail": "..."}   word not in vocabulary
//        500 → {"detail": "..."}   anything else (logged in full)
//
//   GET  /health          {"status": "ok", "vocabulary": 12345}
//
// The model is loaded once before the listener is bound and is
// shared read-only between requests through an Arc.
//
// Like the CLI, this layer only translates: all logic lives in
// the application layer.

pub mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::application::similar_use_case::{SimilarityService, DEFAULT_TOP_K};
use crate::domain::traits::EmbeddingSpace;
use crate::ml::embedding::WordVectors;

use error::ApiError;

/// Shared state for the server.
type SharedService = Arc<SimilarityService<WordVectors>>;

/// Request payload for the similarity endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarRequest {
    pub word: String,
    /// Number of neighbours to return
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    DEFAULT_TOP_K
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarResponse {
    pub similar_words: Vec<String>,
    pub scores:        Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status:     String,
    pub vocabulary: usize,
}

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/similar_words", post(similar_words))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(service: SimilarityService<WordVectors>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Handler for POST /similar_words
async fn similar_words(
    State(service): State<SharedService>,
    Json(request): Json<SimilarRequest>,
) -> Result<Json<SimilarResponse>, ApiError> {
    let neighbors = service.find_similar(&request.word, request.k)?;

    let (similar_words, scores) = neighbors.into_iter().map(|n| (n.token, n.score)).unzip();
    Ok(Json(SimilarResponse { similar_words, scores }))
}

/// Handler for GET /health
async fn health(State(service): State<SharedService>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status:     "ok".to_string(),
        vocabulary: service.space().vocabulary_len(),
    })
}
