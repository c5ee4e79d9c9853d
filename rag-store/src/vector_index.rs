//! Exact (brute-force) nearest-neighbour index over a [`DocumentStore`].
//!
//! Row `i` of the index is passage `i` of the store. Under cosine the rows are
//! L2-normalised once at build time, so a search is one dot product per row.

use std::{cmp::Ordering, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    config::DistanceKind, document_store::DocumentStore, errors::RagError, record::SearchHit,
};

/// Read-only similarity index. Never mutated after `build`.
#[derive(Debug)]
pub struct VectorIndex {
    store: Arc<DocumentStore>,
    metric: DistanceKind,
    dim: usize,
    /// Row-major `len * dim` matrix.
    rows: Vec<f32>,
}

impl VectorIndex {
    /// Builds an index over every passage of `store`.
    ///
    /// # Errors
    /// [`RagError::IndexBuild`] if the store is empty, a row has the wrong size,
    /// or a row is the zero vector under cosine.
    pub fn build(store: Arc<DocumentStore>, metric: DistanceKind) -> Result<Self, RagError> {
        if store.is_empty() {
            return Err(RagError::IndexBuild("document store is empty".into()));
        }
        let dim = store.dimension();
        if dim == 0 {
            return Err(RagError::IndexBuild("embedding dimension is 0".into()));
        }

        let mut rows = Vec::with_capacity(store.len() * dim);
        for p in store.iter() {
            if p.embedding.len() != dim {
                return Err(RagError::IndexBuild(format!(
                    "passage `{}` has size {}, index dimension is {dim}",
                    p.id,
                    p.embedding.len()
                )));
            }
            match metric {
                DistanceKind::Cosine => {
                    let norm = l2_norm(&p.embedding);
                    if norm == 0.0 {
                        return Err(RagError::IndexBuild(format!(
                            "passage `{}` has a zero embedding (undefined under cosine)",
                            p.id
                        )));
                    }
                    rows.extend(p.embedding.iter().map(|x| x / norm));
                }
                DistanceKind::Euclid => rows.extend_from_slice(&p.embedding),
            }
        }

        debug!(passages = store.len(), dim, %metric, "vector index built");
        Ok(Self {
            store,
            metric,
            dim,
            rows,
        })
    }

    /// Returns the `k` passages most similar to `query`, best first.
    ///
    /// Equal scores keep store insertion order. Returns every passage when the
    /// index holds fewer than `k`.
    #[instrument(level = "debug", skip_all, fields(k, metric = %self.metric))]
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, RagError> {
        if k == 0 {
            return Err(RagError::InvalidTopK(k));
        }
        if query.len() != self.dim {
            return Err(RagError::DimensionMismatch {
                query: query.len(),
                index: self.dim,
            });
        }
        if query.iter().any(|x| !x.is_finite()) {
            return Err(RagError::InvalidQueryVector("non-finite component".into()));
        }

        let scores: Vec<(usize, f32)> = match self.metric {
            DistanceKind::Cosine => {
                let norm = l2_norm(query);
                if norm == 0.0 {
                    return Err(RagError::InvalidQueryVector(
                        "zero vector has no direction under cosine".into(),
                    ));
                }
                let q: Vec<f32> = query.iter().map(|x| x / norm).collect();
                self.rows
                    .chunks_exact(self.dim)
                    .enumerate()
                    .map(|(pos, row)| (pos, dot(row, &q).clamp(-1.0, 1.0)))
                    .collect()
            }
            DistanceKind::Euclid => self
                .rows
                .chunks_exact(self.dim)
                .enumerate()
                .map(|(pos, row)| (pos, 1.0 / (1.0 + l2_distance(row, query))))
                .collect(),
        };

        let mut scores = scores;
        let k = k.min(scores.len());
        if k < scores.len() {
            scores.select_nth_unstable_by(k - 1, rank_order);
            scores.truncate(k);
        }
        scores.sort_by(rank_order);

        let hits = scores
            .into_iter()
            .filter_map(|(pos, score)| {
                self.store.passage_at(pos).map(|p| SearchHit {
                    passage: p.clone(),
                    score,
                    position: pos,
                })
            })
            .collect::<Vec<_>>();

        debug!(returned = hits.len(), "search completed");
        Ok(hits)
    }

    /// The store this index was built from.
    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    pub fn metric(&self) -> DistanceKind {
        self.metric
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// Score descending, then insertion position ascending.
fn rank_order(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
