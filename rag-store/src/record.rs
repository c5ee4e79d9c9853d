//! Core data models used by the library.

use std::sync::Arc;

use serde::Serialize;

/// A chunk of source text with its precomputed embedding. Immutable after load.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Passage {
    /// Stable, unique identifier.
    pub id: String,
    /// Non-empty passage text.
    pub text: String,
    /// Document name / section the passage came from.
    pub source_reference: String,
    /// Fixed-length embedding shared by every passage of the store.
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// A single search hit.
#[derive(Clone, Debug)]
pub struct SearchHit {
    pub passage: Arc<Passage>,
    /// Similarity (higher is better).
    pub score: f32,
    /// Insertion position in the document store (tie-break key).
    pub position: usize,
}
