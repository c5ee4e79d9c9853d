//! Corpus and index configuration.

use std::{fmt, path::PathBuf, str::FromStr};

use crate::errors::RagError;

/// Similarity metric of the vector space.
///
/// Must match the metric the embedding model was trained for; a mismatch
/// silently degrades ranking quality rather than failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity (recommended for most embeddings).
    #[default]
    Cosine,
    /// Euclidean distance (L2), reported as `1 / (1 + d)`.
    Euclid,
}

impl FromStr for DistanceKind {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" | "cos" => Ok(DistanceKind::Cosine),
            "l2" | "euclid" | "euclidean" => Ok(DistanceKind::Euclid),
            other => Err(RagError::Config(format!(
                "unknown distance `{other}` (expected cosine or l2)"
            ))),
        }
    }
}

impl fmt::Display for DistanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceKind::Cosine => f.write_str("cosine"),
            DistanceKind::Euclid => f.write_str("l2"),
        }
    }
}

/// Where the corpus lives and how it is indexed.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// JSONL file, or directory of `*.jsonl` files.
    pub corpus_path: PathBuf,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Expected embedding size; checked against the corpus when set.
    pub expected_dim: Option<usize>,
}

impl RagConfig {
    /// Creates a default config for a given corpus path.
    pub fn new_default(corpus_path: impl Into<PathBuf>) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            distance: DistanceKind::Cosine,
            expected_dim: None,
        }
    }

    /// Reads `CORPUS_PATH` (required), `RAG_DISTANCE` and `EMBEDDING_DIM`.
    pub fn from_env() -> Result<Self, RagError> {
        let corpus_path = std::env::var("CORPUS_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| RagError::Config("CORPUS_PATH is not set".into()))?;

        let distance = match std::env::var("RAG_DISTANCE") {
            Ok(v) if !v.trim().is_empty() => v.parse()?,
            _ => DistanceKind::Cosine,
        };

        let expected_dim = match std::env::var("EMBEDDING_DIM") {
            Ok(v) if !v.trim().is_empty() => Some(v.trim().parse::<usize>().map_err(|_| {
                RagError::Config(format!("EMBEDDING_DIM must be a positive integer, got `{v}`"))
            })?),
            _ => None,
        };

        let cfg = Self {
            corpus_path: PathBuf::from(corpus_path),
            distance,
            expected_dim,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.corpus_path.as_os_str().is_empty() {
            return Err(RagError::Config("corpus_path is empty".into()));
        }
        if self.expected_dim == Some(0) {
            return Err(RagError::Config("expected_dim must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_parsing() {
        assert_eq!("Cosine".parse::<DistanceKind>().unwrap(), DistanceKind::Cosine);
        assert_eq!("l2".parse::<DistanceKind>().unwrap(), DistanceKind::Euclid);
        assert_eq!("euclidean".parse::<DistanceKind>().unwrap(), DistanceKind::Euclid);
        assert!(matches!(
            "dot".parse::<DistanceKind>(),
            Err(RagError::Config(_))
        ));
    }

    #[test]
    fn zero_dim_is_rejected() {
        let mut cfg = RagConfig::new_default("corpus.jsonl");
        assert!(cfg.validate().is_ok());
        cfg.expected_dim = Some(0);
        assert!(cfg.validate().is_err());
    }
}
