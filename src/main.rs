use std::{io::IsTerminal, sync::Arc};

use ai_llm_service::{LlmServiceProfiles, telemetry};
use anyhow::Context;
use api::{AppConfig, AppState};
use contextor::{CodeGenerator, LlmSynthesizer, RetrievalOptions, Retriever};
use rag_store::{
    DocumentStore, IndexHandle, IndicatifProgress, LlmEmbedder, NoopProgress, Progress,
    VectorIndex,
};
use tracing::{Level, info};
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file; a missing file is fine.
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e).context("failed to read .env");
    }

    let env_filter = telemetry::env_filter_with_level("info", Level::INFO);
    let app_logs = fmt::layer()
        .with_target(false)
        .with_filter(filter::filter_fn(|meta| {
            !meta.target().starts_with(telemetry::TARGET_PREFIX)
        }));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(app_logs)
        .with(telemetry::layer())
        .init();

    let config = AppConfig::from_env()?;
    let llm = Arc::new(LlmServiceProfiles::from_env(Some(10)).context("LLM profiles")?);

    // Corpus load and index build happen before serving; any failure aborts startup.
    let progress: Box<dyn Progress> = if std::io::stderr().is_terminal() {
        Box::new(IndicatifProgress::spinner())
    } else {
        Box::new(NoopProgress)
    };
    progress.message("loading corpus");
    let store = DocumentStore::load_with_progress(&config.rag.corpus_path, progress.as_ref())
        .with_context(|| format!("loading corpus from {}", config.rag.corpus_path.display()))?;
    if let Some(want) = config.rag.expected_dim {
        store.ensure_dimension(want)?;
    }

    let index = VectorIndex::build(Arc::new(store), config.rag.distance)?;
    let dim = index.dimension();
    let handle = Arc::new(IndexHandle::new());
    handle.publish(index);

    let opts = RetrievalOptions::from_env();
    info!(
        top_k = opts.top_k,
        source_cap = opts.source_cap,
        candidate_multiplier = opts.candidate_multiplier,
        dim,
        "retrieval configured"
    );

    let retriever = Retriever::new(
        handle.clone(),
        Arc::new(LlmEmbedder::new(llm.clone(), Some(dim))),
        Arc::new(LlmSynthesizer::new(llm.clone(), opts.max_ctx_chars)),
        opts.clone(),
    );
    let codegen = CodeGenerator::new(llm.clone(), opts.synth_timeout);

    let state = Arc::new(AppState::new(config, handle, retriever, codegen, Some(llm)));
    api::start(state).await?;

    Ok(())
}
