use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use rag_store::RagError;
use thiserror::Error;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("missing or invalid X-Api-Key")]
    Unauthorized,

    /// Failures of the query pipeline and the code generator.
    #[error(transparent)]
    Contextor(#[from] ContextorError),

    /// Corpus reload failures.
    #[error(transparent)]
    Rag(#[from] RagError),

    /// Rich HTTP error with a specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Contextor(e) => contextor_status(e).0,
            AppError::Rag(e) => rag_status(e).0,
            AppError::Http { status, .. } => *status,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Contextor(e) => contextor_status(e).1,
            AppError::Rag(e) => rag_status(e).1,
            AppError::Http { code, .. } => code,
        }
    }
}

fn contextor_status(e: &ContextorError) -> (StatusCode, &'static str) {
    match e {
        ContextorError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "INVALID_QUERY"),
        ContextorError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
        ContextorError::Retrieval(RagError::InvalidQuery(_)) => {
            (StatusCode::BAD_REQUEST, "INVALID_QUERY")
        }
        ContextorError::Retrieval(RagError::IndexNotReady) => {
            (StatusCode::SERVICE_UNAVAILABLE, "INDEX_NOT_READY")
        }
        ContextorError::Retrieval(_) => (StatusCode::BAD_GATEWAY, "RETRIEVAL_FAILED"),
        ContextorError::Synthesis(_) => (StatusCode::BAD_GATEWAY, "SYNTHESIS_FAILED"),
        ContextorError::Llm(ai_llm_service::AiLlmError::Timeout(_)) => {
            (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT")
        }
        ContextorError::Llm(_) => (StatusCode::BAD_GATEWAY, "SYNTHESIS_FAILED"),
    }
}

fn rag_status(e: &RagError) -> (StatusCode, &'static str) {
    match e {
        RagError::IndexNotReady => (StatusCode::SERVICE_UNAVAILABLE, "INDEX_NOT_READY"),
        RagError::CorpusLoad(_) | RagError::IndexBuild(_) | RagError::VectorSizeMismatch { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "RELOAD_FAILED")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::error(self.error_code(), self.to_string())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
