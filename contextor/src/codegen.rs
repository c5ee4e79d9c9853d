//! Code generation pass-through with output clean-up.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use ai_llm_service::LlmServiceProfiles;
use tracing::{debug, info, instrument};

use crate::{error::ContextorError, prompt};

/// One-shot text completion used for code generation.
pub trait CodeModel: Send + Sync {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>>;
}

/// `fast` generation profile of the shared LLM service.
impl CodeModel for LlmServiceProfiles {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.generate_fast(prompt, Some(system)).await?) })
    }
}

/// Turns a natural-language request into code with a single model call.
#[derive(Clone)]
pub struct CodeGenerator {
    model: Arc<dyn CodeModel>,
    timeout: Duration,
}

impl CodeGenerator {
    pub fn new(model: Arc<dyn CodeModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Generates and cleans code for `request`.
    ///
    /// # Errors
    /// `InvalidQuery` on blank input, `Timeout` when the model is too slow,
    /// otherwise whatever the model call reports.
    #[instrument(skip_all, fields(request_len = request.len()))]
    pub async fn generate(&self, request: &str) -> Result<String, ContextorError> {
        let request = request.trim();
        if request.is_empty() {
            return Err(ContextorError::InvalidQuery("code request is empty".into()));
        }

        let raw = tokio::time::timeout(
            self.timeout,
            self.model.complete(prompt::CODE_SYSTEM.trim(), request),
        )
        .await
        .map_err(|_| ContextorError::Timeout {
            stage: "generate",
            after: self.timeout,
        })??;

        let code = clean_generated_code(&raw);
        debug!(raw_len = raw.len(), code_len = code.len(), "code cleaned");
        info!(lines = code.lines().count(), "code generated");
        Ok(code)
    }
}

/// Strips Markdown fences and model artefacts from generated code.
///
/// Drops fence lines (with or without a language tag), lines containing
/// `endoftext` or a notebook `# In[` marker, and lines that are a lone `.`,
/// then trims surrounding blank lines.
pub fn clean_generated_code(raw: &str) -> String {
    let kept: Vec<&str> = raw
        .lines()
        .filter(|line| {
            let t = line.trim();
            !(t.starts_with("```") || t == "." || line.contains("endoftext") || line.contains("# In["))
        })
        .collect();

    kept.join("\n").trim_matches(|c| c == '\n' || c == '\r').trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl CodeModel for Canned {
        fn complete<'a>(
            &'a self,
            _system: &'a str,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>> {
            Box::pin(async move { Ok(self.0.to_string()) })
        }
    }

    struct Stalled;

    impl CodeModel for Stalled {
        fn complete<'a>(
            &'a self,
            _system: &'a str,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            })
        }
    }

    #[test]
    fn strips_fences_and_artefacts() {
        let raw = "```python\nfrom diagrams import Diagram\n# In[1]:\n.\nwith Diagram(\"Web\"):\n    pass\n<|endoftext|>\n```\n";
        assert_eq!(
            clean_generated_code(raw),
            "from diagrams import Diagram\nwith Diagram(\"Web\"):\n    pass"
        );
    }

    #[test]
    fn keeps_indentation_of_first_line() {
        assert_eq!(clean_generated_code("\n\n    x = 1\n\n"), "    x = 1");
    }

    #[tokio::test]
    async fn generate_cleans_model_output() {
        let g = CodeGenerator::new(Arc::new(Canned("```\nprint('s3')\n```")), Duration::from_secs(5));
        assert_eq!(g.generate("list buckets").await.unwrap(), "print('s3')");
    }

    #[tokio::test]
    async fn blank_request_is_rejected() {
        let g = CodeGenerator::new(Arc::new(Canned("x")), Duration::from_secs(5));
        assert!(matches!(g.generate("  ").await, Err(ContextorError::InvalidQuery(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_model_times_out() {
        let g = CodeGenerator::new(Arc::new(Stalled), Duration::from_secs(2));
        let err = g.generate("vpc diagram").await.unwrap_err();
        assert!(matches!(err, ContextorError::Timeout { stage: "generate", .. }));
    }
}
