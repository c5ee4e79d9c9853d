//! Runtime configuration loaded from environment variables.

use std::time::Duration;

/// Retrieval and synthesis knobs. All fields have defaults via [`Default`] / `from_env`.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievalOptions {
    /// Passages returned after source-cap dedup.
    pub top_k: usize,
    /// Max passages sharing one `source_reference` in a result.
    pub source_cap: usize,
    /// Candidate pool = `top_k * candidate_multiplier` before dedup.
    pub candidate_multiplier: usize,
    /// Candidates scoring below this are dropped. `None` disables the floor.
    pub score_floor: Option<f32>,
    pub embed_timeout: Duration,
    pub synth_timeout: Duration,
    /// Character budget for the context block of the prompt.
    pub max_ctx_chars: usize,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            source_cap: 2,
            candidate_multiplier: 4,
            score_floor: None,
            embed_timeout: Duration::from_secs(30),
            synth_timeout: Duration::from_secs(120),
            max_ctx_chars: 8000,
        }
    }
}

impl RetrievalOptions {
    /// Build from environment variables; unset or unparsable values keep the default.
    ///
    /// Reads `RAG_TOP_K`, `RAG_SOURCE_CAP`, `RAG_CANDIDATE_MULTIPLIER`,
    /// `RAG_SCORE_FLOOR`, `EMBED_TIMEOUT_SECS`, `SYNTH_TIMEOUT_SECS`, `MAX_CTX_CHARS`.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            top_k: parse("RAG_TOP_K", d.top_k).max(1),
            source_cap: parse("RAG_SOURCE_CAP", d.source_cap).max(1),
            candidate_multiplier: parse("RAG_CANDIDATE_MULTIPLIER", d.candidate_multiplier).max(1),
            score_floor: std::env::var("RAG_SCORE_FLOOR")
                .ok()
                .and_then(|v| v.trim().parse::<f32>().ok())
                .filter(|f| f.is_finite()),
            embed_timeout: Duration::from_secs(parse("EMBED_TIMEOUT_SECS", 30u64)),
            synth_timeout: Duration::from_secs(parse("SYNTH_TIMEOUT_SECS", 120u64)),
            max_ctx_chars: parse("MAX_CTX_CHARS", d.max_ctx_chars),
        }
    }

    /// Size of the first candidate pool.
    pub fn candidate_pool(&self) -> usize {
        self.top_k.saturating_mul(self.candidate_multiplier)
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = RetrievalOptions::default();
        assert_eq!((o.top_k, o.source_cap, o.candidate_multiplier), (5, 2, 4));
        assert_eq!(o.candidate_pool(), 20);
        assert_eq!(o.score_floor, None);
        assert_eq!(o.synth_timeout, Duration::from_secs(120));
    }

    #[test]
    fn parse_falls_back_on_garbage() {
        assert_eq!(parse("CONTEXTOR_TEST_SURELY_UNSET_VAR", 7usize), 7);
    }
}
