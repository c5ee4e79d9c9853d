//! GET /health — readiness of the index, optionally of the LLM providers.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HealthParams {
    /// Also probe LLM providers.
    #[serde(default)]
    pub deep: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, `degraded` (deep probe failed) or `starting`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passages: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<Vec<HealthStatus>>,
}

/// Handler: GET /health[?deep=true]
pub async fn health(State(state): State<Arc<AppState>>, Query(p): Query<HealthParams>) -> Response {
    let Ok((index, generation)) = state.index.snapshot() else {
        debug!("health: index not published yet");
        let body = HealthResponse {
            status: "starting",
            passages: None,
            dimension: None,
            metric: None,
            generation: None,
            llm: None,
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    };

    let llm = match (&state.llm, p.deep) {
        (Some(svc), true) => Some(svc.health_all().await),
        _ => None,
    };
    let degraded = llm
        .as_ref()
        .is_some_and(|list| list.iter().any(|s| !s.ok));

    let body = HealthResponse {
        status: if degraded { "degraded" } else { "ok" },
        passages: Some(index.len()),
        dimension: Some(index.dimension()),
        metric: Some(index.metric().to_string()),
        generation: Some(generation),
        llm,
    };
    (StatusCode::OK, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support;

    async fn json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn ready_index_reports_stats() {
        let resp = health(State(test_support::state()), Query(HealthParams::default())).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let v = json(resp).await;
        assert_eq!(v["status"], "ok");
        assert_eq!(v["passages"], 3);
        assert_eq!(v["dimension"], 3);
        assert_eq!(v["metric"], "cosine");
        assert_eq!(v["generation"], 1);
        assert!(v.get("llm").is_none());
    }

    #[tokio::test]
    async fn unpublished_index_is_starting() {
        let resp = health(
            State(test_support::state_without_index()),
            Query(HealthParams { deep: true }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json(resp).await["status"], "starting");
    }
}
