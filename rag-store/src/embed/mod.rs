//! Query embedding seam.
//!
//! Async because real providers (Ollama, OpenAI) perform HTTP requests.

use std::{future::Future, pin::Pin};

use crate::errors::RagError;

pub mod llm_embedder;

/// Maps text into the corpus vector space.
///
/// Implementations must reject empty or whitespace-only input with
/// [`RagError::InvalidQuery`] and report backend failures as [`RagError::Embedding`].
/// Query and corpus vectors must come from the same model version.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>;
}

/// Trims `text`, failing with [`RagError::InvalidQuery`] when nothing is left.
pub fn ensure_non_empty(text: &str) -> Result<&str, RagError> {
    let t = text.trim();
    if t.is_empty() {
        return Err(RagError::InvalidQuery("text to embed is empty".into()));
    }
    Ok(t)
}
