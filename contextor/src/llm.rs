//! Answer synthesis seam and its LLM-backed implementation.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use tracing::debug;

use crate::{api_types::ContextPassage, error::ContextorError, prompt};

/// Produces a natural-language answer from a query and its ranked context.
pub trait AnswerSynthesizer: Send + Sync {
    fn synthesize<'a>(
        &'a self,
        query: &'a str,
        context: &'a [ContextPassage],
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>>;
}

/// Synthesizer over the `slow` generation profile.
///
/// # Example
/// ```no_run
/// # use std::sync::Arc;
/// # use ai_llm_service::LlmServiceProfiles;
/// # use contextor::{AnswerSynthesizer, LlmSynthesizer};
/// # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let svc = Arc::new(LlmServiceProfiles::from_env(Some(10))?);
/// let synth = LlmSynthesizer::new(svc, 8000);
/// let out = synth.synthesize("What is the reliability pillar?", &[]).await?;
/// println!("{out}");
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct LlmSynthesizer {
    svc: Arc<LlmServiceProfiles>,
    max_ctx_chars: usize,
}

impl LlmSynthesizer {
    pub fn new(svc: Arc<LlmServiceProfiles>, max_ctx_chars: usize) -> Self {
        Self { svc, max_ctx_chars }
    }
}

impl AnswerSynthesizer for LlmSynthesizer {
    fn synthesize<'a>(
        &'a self,
        query: &'a str,
        context: &'a [ContextPassage],
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>> {
        Box::pin(async move {
            let user = prompt::build_user_prompt(query, context, self.max_ctx_chars);
            debug!(prompt_len = user.len(), "calling slow profile");

            let answer = self
                .svc
                .generate_slow(&user, Some(prompt::DEFAULT_SYSTEM.trim()))
                .await
                .map_err(|e| ContextorError::Synthesis(e.to_string()))?;

            non_empty_answer(&answer)
        })
    }
}

/// Trimmed model reply, or `Synthesis` when nothing is left.
fn non_empty_answer(raw: &str) -> Result<String, ContextorError> {
    let answer = raw.trim();
    if answer.is_empty() {
        return Err(ContextorError::Synthesis("model returned an empty answer".into()));
    }
    Ok(answer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{LlmModelConfig, LlmProvider};

    fn unreachable_svc() -> Arc<LlmServiceProfiles> {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:14b".into(),
            endpoint: "http://127.0.0.1:9".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        };
        Arc::new(LlmServiceProfiles::new(cfg.clone(), None, cfg, Some(1)).unwrap())
    }

    #[test]
    fn blank_reply_is_a_synthesis_error() {
        assert!(matches!(non_empty_answer(""), Err(ContextorError::Synthesis(_))));
        assert!(matches!(non_empty_answer(" \n\t "), Err(ContextorError::Synthesis(_))));
        assert_eq!(non_empty_answer("  Use Multi-AZ.\n").unwrap(), "Use Multi-AZ.");
    }

    #[tokio::test]
    async fn unreachable_backend_maps_to_synthesis_error() {
        let synth = LlmSynthesizer::new(unreachable_svc(), 8000);
        let context = [ContextPassage {
            id: "rel-1".into(),
            text: "Deploy across multiple Availability Zones.".into(),
            source_reference: "reliability.md".into(),
            score: 0.9,
        }];

        let err = synth.synthesize("How do I make S3 durable?", &context).await.unwrap_err();
        assert!(matches!(err, ContextorError::Synthesis(_)));
        assert!(err.is_transient());
    }
}
