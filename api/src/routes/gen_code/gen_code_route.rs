//! GET /gen_code — code generation pass-through.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use tracing::{debug, error};

use crate::{
    core::{app_state::AppState, http::request_id::request_id, retry::retry_with_backoff},
    error_handler::AppResult,
    routes::gen_code::gen_code_request::{GenCodeParams, GenCodeResponse},
};

/// Handler: GET /gen_code?query=...
pub async fn gen_code(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(p): Query<GenCodeParams>,
) -> AppResult<Json<GenCodeResponse>> {
    let request_id = request_id(&headers);
    debug!(request_id = %request_id, query = %p.query, "gen_code: start");

    let codegen = &state.codegen;
    match retry_with_backoff(state.config.retry, "gen_code", || codegen.generate(&p.query)).await {
        Ok(code) => {
            debug!(request_id = %request_id, code_len = code.len(), "gen_code: success");
            Ok(Json(GenCodeResponse { code }))
        }
        Err(err) => {
            error!(request_id = %request_id, error = %err, "gen_code: failed");
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn returns_cleaned_code() {
        let Json(out) = gen_code(
            State(test_support::state()),
            HeaderMap::new(),
            Query(GenCodeParams {
                query: "three tier web app diagram".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(out.code, "from diagrams import Diagram\nwith Diagram(\"web\"):\n    pass");
    }

    #[tokio::test]
    async fn blank_request_is_400() {
        let err = gen_code(
            State(test_support::state()),
            HeaderMap::new(),
            Query(GenCodeParams::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
