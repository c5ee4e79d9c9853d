//! GET /query_well_arch_framework — answers a question from the Well-Architected corpus.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use contextor::QaAnswer;
use tracing::{debug, error, info};

use crate::{
    core::{app_state::AppState, http::request_id::request_id, retry::retry_with_backoff},
    error_handler::AppResult,
    routes::query::query_request::QueryParams,
};

/// Handler: GET /query_well_arch_framework?query=...
///
/// # Example
/// ```bash
/// curl -H 'X-Api-Key: $API_KEY' \
///   'http://127.0.0.1:8080/query_well_arch_framework?query=How%20do%20I%20design%20for%20high%20availability%3F'
/// ```
pub async fn query_well_arch_framework(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(p): Query<QueryParams>,
) -> AppResult<Json<QaAnswer>> {
    let request_id = request_id(&headers);
    debug!(request_id = %request_id, query = %p.query, "query_well_arch_framework: start");

    let retriever = &state.retriever;
    let result = retry_with_backoff(state.config.retry, "query_well_arch_framework", || {
        retriever.ask(&p.query)
    })
    .await;

    match result {
        Ok(qa) => {
            info!(
                request_id = %request_id,
                sources = qa.sources.len(),
                "query_well_arch_framework: answered"
            );
            Ok(Json(qa))
        }
        Err(err) => {
            error!(
                request_id = %request_id,
                error = %err,
                "query_well_arch_framework: failed"
            );
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error_handler::AppError, routes::test_support};
    use axum::http::StatusCode;

    fn params(q: &str) -> Query<QueryParams> {
        Query(QueryParams { query: q.into() })
    }

    #[tokio::test]
    async fn answers_and_cites_sources() {
        let state = test_support::state();
        let Json(qa) = query_well_arch_framework(
            State(state),
            HeaderMap::new(),
            params("How do I design for high availability?"),
        )
        .await
        .unwrap();

        assert_eq!(qa.sources[0], "performance-ec2.md");
        assert_eq!(qa.context[0].id, "ec2");
        assert!(qa.answer.contains("Auto Scaling"));
    }

    #[tokio::test]
    async fn empty_query_is_400() {
        let err = query_well_arch_framework(State(test_support::state()), HeaderMap::new(), params(" "))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_QUERY");
    }

    #[tokio::test]
    async fn unpublished_index_is_503() {
        let err = query_well_arch_framework(
            State(test_support::state_without_index()),
            HeaderMap::new(),
            params("scaling"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Contextor(_)));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
