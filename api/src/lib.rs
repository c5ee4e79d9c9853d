//! HTTP surface of the Well-Architected advisor.
//!
//! Routes:
//! - `GET  /query_well_arch_framework?query=` (API key)
//! - `GET  /gen_code?query=` (API key)
//! - `POST /reload_corpus` (API key)
//! - `GET  /health[?deep=true]`

use std::sync::Arc;

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info, warn};

pub use crate::core::{app_config::AppConfig, app_state::AppState, retry::RetryPolicy};
pub use error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::api_key::require_api_key,
    routes::{
        gen_code::gen_code_route::gen_code, health::health_route::health,
        query::query_route::query_well_arch_framework,
        reload_corpus::reload_corpus_route::reload_corpus,
    },
};

/// Builds the router; `/health` stays open, everything else sits behind the API key guard.
pub fn build_router(state: Arc<AppState>) -> Router {
    if state.config.api_key.is_none() {
        warn!("API_KEY is not set; query, gen_code and reload endpoints are unauthenticated");
    }

    let protected = Router::new()
        .route("/query_well_arch_framework", get(query_well_arch_framework))
        .route("/gen_code", get(gen_code))
        .route("/reload_corpus", post(reload_corpus))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}

/// Binds `API_ADDRESS` and serves until Ctrl+C.
pub async fn start(state: Arc<AppState>) -> Result<(), AppError> {
    let addr = state.config.api_address.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_builds_with_and_without_key() {
        let _ = build_router(routes::test_support::state());

        let state = routes::test_support::state();
        let mut with_key = (*state).clone();
        with_key.config.api_key = Some("s3cret".into());
        let _ = build_router(Arc::new(with_key));
    }

    #[tokio::test]
    async fn guard_protects_query_but_not_health() {
        let mut keyed = (*routes::test_support::state()).clone();
        keyed.config.api_key = Some("s3cret".into());
        let app = build_router(Arc::new(keyed));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await });

        let http = reqwest::Client::new();
        let query = format!("{base}/query_well_arch_framework?query=S3%20durability");

        let health = http.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(health.status(), 200);

        let denied = http.get(&query).send().await.unwrap();
        assert_eq!(denied.status(), 401);
        let body: serde_json::Value = denied.json().await.unwrap();
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let wrong = http.get(&query).header("X-Api-Key", "nope").send().await.unwrap();
        assert_eq!(wrong.status(), 401);

        let allowed = http.get(&query).header("X-Api-Key", "s3cret").send().await.unwrap();
        assert_eq!(allowed.status(), 200);
    }
}
