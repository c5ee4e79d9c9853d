//! Deterministic in-memory state for handler tests (no network).

use std::{future::Future, path::Path, pin::Pin, sync::Arc, time::Duration};

use contextor::{
    AnswerSynthesizer, CodeGenerator, CodeModel, ContextPassage, ContextorError, RetrievalOptions,
    Retriever,
};
use rag_store::{
    DistanceKind, DocumentStore, EmbeddingsProvider, IndexHandle, Passage, RagConfig, RagError,
    VectorIndex, ensure_non_empty,
};

use crate::core::{app_config::AppConfig, app_state::AppState, retry::RetryPolicy};

/// Axes: (storage, compute, identity).
struct KeywordEmbedder;

impl EmbeddingsProvider for KeywordEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            let t = ensure_non_empty(text)?.to_lowercase();
            Ok(vec![
                if t.contains("durab") { 1.0 } else { 0.05 },
                if t.contains("availability") || t.contains("scal") { 1.0 } else { 0.05 },
                if t.contains("permission") { 1.0 } else { 0.05 },
            ])
        })
    }
}

struct CitingSynth;

impl AnswerSynthesizer for CitingSynth {
    fn synthesize<'a>(
        &'a self,
        _query: &'a str,
        context: &'a [ContextPassage],
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>> {
        Box::pin(async move {
            let top = context
                .first()
                .ok_or_else(|| ContextorError::Synthesis("no context".into()))?;
            Ok(format!("{} [{}]", top.text, top.source_reference))
        })
    }
}

struct CannedCode;

impl CodeModel for CannedCode {
    fn complete<'a>(
        &'a self,
        _system: &'a str,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>> {
        Box::pin(async {
            Ok("```python\nfrom diagrams import Diagram\nwith Diagram(\"web\"):\n    pass\n```".into())
        })
    }
}

fn corpus() -> Vec<Passage> {
    let p = |id: &str, text: &str, src: &str, emb: Vec<f32>| Passage {
        id: id.into(),
        text: text.into(),
        source_reference: src.into(),
        embedding: emb,
    };
    vec![
        p("s3", "S3 is designed for eleven nines of durability.", "reliability-s3.md", vec![1.0, 0.0, 0.0]),
        p("ec2", "Use EC2 Auto Scaling across multiple AZs.", "performance-ec2.md", vec![0.0, 1.0, 0.0]),
        p("iam", "Grant IAM least privilege permissions.", "security-iam.md", vec![0.0, 0.0, 1.0]),
    ]
}

fn build(index: Arc<IndexHandle>, corpus_path: &Path) -> Arc<AppState> {
    let config = AppConfig {
        api_address: "127.0.0.1:0".into(),
        api_key: None,
        retry: RetryPolicy {
            max_attempts: 1,
            initial_delay: Duration::from_millis(1),
        },
        rag: RagConfig::new_default(corpus_path),
    };
    let retriever = Retriever::new(
        index.clone(),
        Arc::new(KeywordEmbedder),
        Arc::new(CitingSynth),
        RetrievalOptions::default(),
    );
    let codegen = CodeGenerator::new(Arc::new(CannedCode), Duration::from_secs(5));
    Arc::new(AppState::new(config, index, retriever, codegen, None))
}

fn published() -> Arc<IndexHandle> {
    let store = Arc::new(DocumentStore::from_passages(corpus()).expect("valid corpus"));
    let handle = Arc::new(IndexHandle::new());
    handle.publish(VectorIndex::build(store, DistanceKind::Cosine).expect("index builds"));
    handle
}

/// State serving the three-passage corpus at generation 1.
pub fn state() -> Arc<AppState> {
    build(published(), Path::new("unused.jsonl"))
}

/// Same as [`state`], with `/reload_corpus` pointed at `path`.
pub fn state_with_corpus_path(path: &Path) -> Arc<AppState> {
    build(published(), path)
}

/// State whose index was never published.
pub fn state_without_index() -> Arc<AppState> {
    build(Arc::new(IndexHandle::new()), Path::new("unused.jsonl"))
}
