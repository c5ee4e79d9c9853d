//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The persisted corpus is missing, malformed, or inconsistent.
    #[error("corpus load error: {0}")]
    CorpusLoad(String),

    /// The vector index could not be built from the store.
    #[error("index build error: {0}")]
    IndexBuild(String),

    /// No index has been published yet.
    #[error("index is not ready")]
    IndexNotReady,

    /// Unknown passage id.
    #[error("passage not found: {0}")]
    NotFound(String),

    /// Embedding backend failed or is unavailable.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Query text was empty or blank.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Query vector cannot be scored (non-finite values, zero norm under cosine).
    #[error("invalid query vector: {0}")]
    InvalidQueryVector(String),

    /// `k` must be at least 1.
    #[error("top_k must be >= 1, got {0}")]
    InvalidTopK(usize),

    /// Query vector size differs from the index dimensionality.
    #[error("dimension mismatch: query has {query}, index has {index}")]
    DimensionMismatch { query: usize, index: usize },

    /// Mismatch in vector dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl RagError {
    /// Whether the failure may go away on retry (external embedding backend only).
    pub fn is_transient(&self) -> bool {
        matches!(self, RagError::Embedding(_))
    }
}
