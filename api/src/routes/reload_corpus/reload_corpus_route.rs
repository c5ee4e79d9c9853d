//! POST /reload_corpus — rebuilds the index from `CORPUS_PATH` and swaps it in.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub generation: u64,
    pub passages: usize,
}

/// Handler: POST /reload_corpus
///
/// Without `EMBEDDING_DIM` the new corpus must keep the served dimension, so
/// the query embedder stays compatible. A failed reload leaves the old index live.
pub async fn reload_corpus(State(state): State<Arc<AppState>>) -> AppResult<Json<ReloadResponse>> {
    let index = state.index.clone();
    let rag = state.config.rag.clone();
    let expected_dim = rag
        .expected_dim
        .or_else(|| index.current().ok().map(|i| i.dimension()));

    let reloaded = tokio::task::spawn_blocking(move || {
        index.reload(&rag.corpus_path, rag.distance, expected_dim)
    })
    .await
    .map_err(|e| AppError::Http {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "RELOAD_FAILED",
        message: format!("reload task failed: {e}"),
    })?;

    match reloaded {
        Ok((generation, passages)) => {
            info!(generation, passages, "reload_corpus: published");
            Ok(Json(ReloadResponse {
                generation,
                passages,
            }))
        }
        Err(err) => {
            error!(error = %err, "reload_corpus: failed");
            Err(err.into())
        }
    }
}
