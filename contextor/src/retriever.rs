//! Retrieval orchestration: embed, search, dedupe, assemble, synthesize.
//!
//! All collaborators are injected, so the pipeline runs unchanged against
//! deterministic stubs in tests. The orchestrator never retries; retry policy
//! belongs to its caller.

use std::{future::Future, sync::Arc, time::Duration};

use rag_store::{EmbeddingsProvider, IndexHandle, SearchHit, VectorIndex};
use tracing::{debug, info, instrument};

use crate::{
    api_types::{ContextPassage, QaAnswer, cited_sources},
    cfg::RetrievalOptions,
    error::ContextorError,
    llm::AnswerSynthesizer,
    select::cap_per_source,
};

/// Query pipeline over the currently published index.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<IndexHandle>,
    embedder: Arc<dyn EmbeddingsProvider>,
    synthesizer: Arc<dyn AnswerSynthesizer>,
    opts: RetrievalOptions,
}

impl Retriever {
    pub fn new(
        index: Arc<IndexHandle>,
        embedder: Arc<dyn EmbeddingsProvider>,
        synthesizer: Arc<dyn AnswerSynthesizer>,
        opts: RetrievalOptions,
    ) -> Self {
        Self {
            index,
            embedder,
            synthesizer,
            opts,
        }
    }

    /// Ranked, source-capped context for `query` (no synthesis).
    ///
    /// # Errors
    /// - `InvalidQuery` for blank input
    /// - `Timeout { stage: "embed" }` when embedding exceeds `embed_timeout`
    /// - `Retrieval` for embedding or index failures (including `IndexNotReady`)
    #[instrument(skip_all, fields(query_len = query.len()))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ContextPassage>, ContextorError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ContextorError::InvalidQuery("query is empty".into()));
        }

        let qvec = with_timeout("embed", self.opts.embed_timeout, async {
            self.embedder.embed(query).await.map_err(ContextorError::from)
        })
        .await?;

        let index = self.index.current()?;
        let hits = self.select(&index, &qvec)?;

        let context: Vec<ContextPassage> = hits.iter().map(ContextPassage::from).collect();
        debug!(
            selected = context.len(),
            best = context.first().map(|c| c.score),
            "context selected"
        );
        Ok(context)
    }

    /// Full question answering: [`Retriever::retrieve`] then synthesis.
    ///
    /// # Errors
    /// Everything `retrieve` returns, plus `Synthesis` and
    /// `Timeout { stage: "synthesize" }`.
    #[instrument(skip_all, fields(query_len = query.len()))]
    pub async fn ask(&self, query: &str) -> Result<QaAnswer, ContextorError> {
        let context = self.retrieve(query).await?;

        let answer = with_timeout(
            "synthesize",
            self.opts.synth_timeout,
            self.synthesizer.synthesize(query.trim(), &context),
        )
        .await?;

        let sources = cited_sources(&context);
        info!(
            passages = context.len(),
            sources = sources.len(),
            answer_len = answer.len(),
            "question answered"
        );
        Ok(QaAnswer {
            answer,
            sources,
            context,
        })
    }

    /// Candidate pool search plus source-cap dedup, widening to the whole
    /// corpus when the first pool cannot fill `top_k`.
    fn select(&self, index: &VectorIndex, qvec: &[f32]) -> Result<Vec<SearchHit>, ContextorError> {
        let top_k = self.opts.top_k.max(1);
        let cap = self.opts.source_cap.max(1);
        let total = index.len();
        let pool = self.opts.candidate_pool().clamp(top_k, total.max(top_k));

        let mut picked = cap_per_source(&self.floor(index.search(qvec, pool)?), top_k, cap);

        if picked.len() < top_k && pool < total {
            debug!(pool, total, picked = picked.len(), "widening candidate pool");
            picked = cap_per_source(&self.floor(index.search(qvec, total)?), top_k, cap);
        }
        Ok(picked)
    }

    fn floor(&self, hits: Vec<SearchHit>) -> Vec<SearchHit> {
        match self.opts.score_floor {
            Some(min) => hits.into_iter().filter(|h| h.score >= min).collect(),
            None => hits,
        }
    }
}

async fn with_timeout<T, F>(stage: &'static str, after: Duration, fut: F) -> Result<T, ContextorError>
where
    F: Future<Output = Result<T, ContextorError>>,
{
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| ContextorError::Timeout { stage, after })?
}
