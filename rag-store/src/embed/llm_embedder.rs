//! [`EmbeddingsProvider`] backed by the `embedding` profile of `ai-llm-service`.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use tracing::{debug, warn};

use super::{EmbeddingsProvider, ensure_non_empty};
use crate::errors::RagError;

/// Embeds queries through the shared LLM service.
///
/// When `expected_dim` is set, a vector of another size is rejected with
/// [`RagError::VectorSizeMismatch`] before it can reach the index.
#[derive(Clone, Debug)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
    expected_dim: Option<usize>,
}

impl LlmEmbedder {
    pub fn new(svc: Arc<LlmServiceProfiles>, expected_dim: Option<usize>) -> Self {
        Self { svc, expected_dim }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            let text = ensure_non_empty(text)?;
            let v = self.svc.embed(text).await.map_err(|e| {
                warn!(error = %e, "embedding backend failed");
                RagError::Embedding(e.to_string())
            })?;

            if v.is_empty() {
                return Err(RagError::Embedding("backend returned an empty vector".into()));
            }
            if let Some(want) = self.expected_dim
                && v.len() != want
            {
                return Err(RagError::VectorSizeMismatch { got: v.len(), want });
            }
            debug!(dim = v.len(), "query embedded");
            Ok(v)
        })
    }
}
