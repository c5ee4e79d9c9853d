use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use contextor::{CodeGenerator, Retriever};
use rag_store::IndexHandle;

use crate::core::app_config::AppConfig;

/// Shared state for all HTTP handlers.
///
/// Built by the startup routine; tests assemble their own from stub collaborators.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Live index, also swapped by `/reload_corpus`.
    pub index: Arc<IndexHandle>,
    pub retriever: Retriever,
    pub codegen: CodeGenerator,
    /// LLM profiles for `/health?deep=true`; `None` skips provider probes.
    pub llm: Option<Arc<LlmServiceProfiles>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        index: Arc<IndexHandle>,
        retriever: Retriever,
        codegen: CodeGenerator,
        llm: Option<Arc<LlmServiceProfiles>>,
    ) -> Self {
        Self {
            config,
            index,
            retriever,
            codegen,
            llm,
        }
    }
}
