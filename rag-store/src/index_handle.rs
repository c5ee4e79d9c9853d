//! Atomic publication point for the live [`VectorIndex`].
//!
//! The lock only guards the `Arc` swap: readers clone the `Arc` and release the
//! lock before scoring, so a rebuild never blocks a running search and a search
//! never sees a half-built index.

use std::{
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use tracing::{info, warn};

use crate::{
    config::DistanceKind, document_store::DocumentStore, errors::RagError, record::SearchHit,
    vector_index::VectorIndex,
};

#[derive(Debug, Clone)]
struct Published {
    index: Arc<VectorIndex>,
    generation: u64,
}

/// Shared slot holding the currently served index, if any.
#[derive(Debug, Default)]
pub struct IndexHandle {
    slot: RwLock<Option<Published>>,
}

impl IndexHandle {
    /// Empty handle; every read fails with [`RagError::IndexNotReady`] until `publish`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the served index and returns its generation (1 for the first publish).
    pub fn publish(&self, index: VectorIndex) -> u64 {
        let index = Arc::new(index);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        let generation = slot.as_ref().map_or(1, |p| p.generation + 1);
        info!(
            generation,
            passages = index.len(),
            dim = index.dimension(),
            metric = %index.metric(),
            "index published"
        );
        *slot = Some(Published { index, generation });
        generation
    }

    /// The served index.
    pub fn current(&self) -> Result<Arc<VectorIndex>, RagError> {
        self.snapshot().map(|(index, _)| index)
    }

    /// The served index together with its generation.
    pub fn snapshot(&self) -> Result<(Arc<VectorIndex>, u64), RagError> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .map(|p| (p.index.clone(), p.generation))
            .ok_or(RagError::IndexNotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Searches whatever index is current at call time.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, RagError> {
        let index = self.current()?;
        index.search(query, k)
    }

    /// Loads `source`, builds a fresh index and publishes it.
    ///
    /// Blocking (file IO plus a full build). On any error the previously
    /// published index keeps serving.
    pub fn reload(
        &self,
        source: &Path,
        metric: DistanceKind,
        expected_dim: Option<usize>,
    ) -> Result<(u64, usize), RagError> {
        let built = DocumentStore::load(source).and_then(|store| {
            if let Some(want) = expected_dim {
                store.ensure_dimension(want)?;
            }
            VectorIndex::build(Arc::new(store), metric)
        });

        match built {
            Ok(index) => {
                let passages = index.len();
                Ok((self.publish(index), passages))
            }
            Err(e) => {
                warn!(error = %e, source = %source.display(), "reload failed; keeping current index");
                Err(e)
            }
        }
    }
}
