//! Retrieval-augmented question answering over the Well-Architected corpus.
//!
//! [`Retriever`] embeds the question, searches the published index, caps the
//! number of passages per source, and hands the ranked context to an
//! [`AnswerSynthesizer`]. [`CodeGenerator`] is the code-only pass-through.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//! use contextor::{LlmSynthesizer, RetrievalOptions, Retriever};
//! use rag_store::{IndexHandle, LlmEmbedder};
//!
//! # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::from_env(Some(10))?);
//! let index = Arc::new(IndexHandle::new());
//! let opts = RetrievalOptions::from_env();
//! let retriever = Retriever::new(
//!     index,
//!     Arc::new(LlmEmbedder::new(svc.clone(), None)),
//!     Arc::new(LlmSynthesizer::new(svc, opts.max_ctx_chars)),
//!     opts,
//! );
//! let qa = retriever.ask("How do I design for high availability?").await?;
//! println!("{} ({:?})", qa.answer, qa.sources);
//! # Ok(()) }
//! ```

mod api_types;
mod cfg;
mod codegen;
mod error;
mod llm;
mod retriever;

pub mod prompt;
pub mod select;

pub use api_types::{ContextPassage, QaAnswer, cited_sources};
pub use cfg::RetrievalOptions;
pub use codegen::{CodeGenerator, CodeModel, clean_generated_code};
pub use error::ContextorError;
pub use llm::{AnswerSynthesizer, LlmSynthesizer};
pub use retriever::Retriever;
