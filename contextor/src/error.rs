//! Typed error for the contextor crate.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// Empty or whitespace-only request text.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Embedding or index failure.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] rag_store::RagError),

    /// The answer synthesizer failed or produced nothing usable.
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// An external call did not finish in time.
    #[error("{stage} timed out after {}s", after.as_secs())]
    Timeout { stage: &'static str, after: Duration },

    /// Errors from the LLM service (code generation path).
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),
}

impl ContextorError {
    /// Whether a caller may retry the same request.
    ///
    /// Invalid input, a missing index and bad search arguments are deterministic
    /// and never transient.
    pub fn is_transient(&self) -> bool {
        match self {
            ContextorError::InvalidQuery(_) => false,
            ContextorError::Retrieval(e) => e.is_transient(),
            ContextorError::Synthesis(_) => true,
            ContextorError::Timeout { .. } => true,
            ContextorError::Llm(e) => e.is_transient(),
        }
    }
}
