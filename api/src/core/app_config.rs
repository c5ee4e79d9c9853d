//! Process configuration read once at startup.

use std::time::Duration;

use rag_store::RagConfig;

use crate::{core::retry::RetryPolicy, error_handler::AppError};

/// Everything the HTTP layer needs from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `API_ADDRESS`, e.g. `0.0.0.0:8080`.
    pub api_address: String,
    /// `API_KEY`; `None` disables the `X-Api-Key` guard.
    pub api_key: Option<String>,
    pub retry: RetryPolicy,
    /// Corpus location and index metric, reused by `/reload_corpus`.
    pub rag: RagConfig,
}

impl AppConfig {
    /// Reads `API_ADDRESS`, `API_KEY`, `RETRY_MAX_ATTEMPTS`, `RETRY_INITIAL_DELAY_MS`
    /// and the corpus variables (`CORPUS_PATH`, `RAG_DISTANCE`, `EMBEDDING_DIM`).
    pub fn from_env() -> Result<Self, AppError> {
        let api_address = env("API_ADDRESS", "127.0.0.1:8080");
        let api_key = std::env::var("API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let retry = RetryPolicy {
            max_attempts: parse("RETRY_MAX_ATTEMPTS", 3u32).max(1),
            initial_delay: Duration::from_millis(parse("RETRY_INITIAL_DELAY_MS", 1000u64)),
        };

        let rag = RagConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            api_address,
            api_key,
            retry,
            rag,
        })
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}
