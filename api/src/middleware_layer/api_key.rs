//! `X-Api-Key` guard for the query, code generation and reload endpoints.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{core::app_state::AppState, error_handler::AppError};

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Accepts the request when no key is configured or the header matches it.
pub fn check_api_key(expected: Option<&str>, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let given = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    match given {
        Some(k) if constant_time_eq(k.as_bytes(), expected.as_bytes()) => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

/// Axum middleware wrapping [`check_api_key`].
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match check_api_key(state.config.api_key.as_deref(), req.headers()) {
        Ok(()) => next.run(req).await,
        Err(e) => {
            warn!(path = %req.uri().path(), "rejected request: bad or missing API key");
            e.into_response()
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
