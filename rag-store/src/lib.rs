//! In-memory RAG corpus: JSONL document store, exact vector index, and the
//! atomically swapped handle the query path reads from.
//!
//! Typical startup:
//! ```no_run
//! use std::sync::Arc;
//! use rag_store::{DistanceKind, DocumentStore, IndexHandle, VectorIndex};
//!
//! # fn main() -> Result<(), rag_store::RagError> {
//! let store = Arc::new(DocumentStore::load("data/well_arch.jsonl")?);
//! let index = VectorIndex::build(store, DistanceKind::Cosine)?;
//! let handle = IndexHandle::new();
//! handle.publish(index);
//! let hits = handle.search(&[0.1, 0.2, 0.3], 5)?;
//! # let _ = hits;
//! # Ok(()) }
//! ```

mod config;
mod discovery;
mod document_store;
mod errors;
mod index_handle;
mod io_jsonl;
mod progress;
mod record;
mod vector_index;

pub mod embed;

pub use config::{DistanceKind, RagConfig};
pub use document_store::DocumentStore;
pub use embed::{EmbeddingsProvider, ensure_non_empty, llm_embedder::LlmEmbedder};
pub use errors::RagError;
pub use index_handle::IndexHandle;
pub use progress::{IndicatifProgress, NoopProgress, Progress};
pub use record::{Passage, SearchHit};
pub use vector_index::VectorIndex;
