//! Read-only, in-memory store of corpus passages.
//!
//! Loaded once from JSONL, validated as a whole, then shared behind `Arc`.
//! Insertion order (files in name order, rows in file order) is preserved and
//! serves as the tie-break key for equal similarity scores.

use std::{collections::HashMap, path::Path, sync::Arc};

use tracing::{debug, info};

use crate::{
    discovery::corpus_files,
    errors::RagError,
    io_jsonl::read_located,
    progress::{NoopProgress, Progress},
    record::Passage,
};

/// Immutable passage collection with id lookup.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    passages: Vec<Arc<Passage>>,
    by_id: HashMap<String, usize>,
    dim: usize,
}

impl DocumentStore {
    /// Loads the corpus at `source` (a JSONL file or a directory of them).
    ///
    /// # Errors
    /// [`RagError::CorpusLoad`] if the source is missing or unreadable, a row is
    /// malformed, an id repeats, a text is blank, or embedding sizes disagree.
    pub fn load(source: impl AsRef<Path>) -> Result<Self, RagError> {
        Self::load_with_progress(source, &NoopProgress)
    }

    /// Same as [`DocumentStore::load`], reporting one step per corpus file.
    pub fn load_with_progress(
        source: impl AsRef<Path>,
        progress: &dyn Progress,
    ) -> Result<Self, RagError> {
        let files = corpus_files(source.as_ref())?;
        progress.set_total(files.len() as u64);

        let mut rows = Vec::new();
        for file in &files {
            let mut part = read_located(file)?;
            debug!(file = %file.display(), rows = part.len(), "corpus file parsed");
            rows.append(&mut part);
            progress.step(&file.display().to_string());
        }

        let store = Self::assemble(rows.into_iter().map(|r| (Some(r.location()), r.value)))?;
        progress.finish(&format!("loaded {} passages", store.len()));
        info!(
            source = %source.as_ref().display(),
            files = files.len(),
            passages = store.len(),
            dim = store.dimension(),
            "corpus loaded"
        );
        Ok(store)
    }

    /// Builds a store from already-parsed passages, applying the same checks as `load`.
    pub fn from_passages(rows: Vec<Passage>) -> Result<Self, RagError> {
        Self::assemble(rows.into_iter().map(|p| (None, p)))
    }

    /// Validates rows in order. Errors are prefixed with the row's `path:line` when known.
    fn assemble(
        rows: impl ExactSizeIterator<Item = (Option<String>, Passage)>,
    ) -> Result<Self, RagError> {
        if rows.len() == 0 {
            return Err(RagError::CorpusLoad("corpus contains no passages".into()));
        }

        let mut passages: Vec<Arc<Passage>> = Vec::with_capacity(rows.len());
        let mut by_id = HashMap::with_capacity(rows.len());
        let mut dim = 0;

        for (pos, (loc, p)) in rows.enumerate() {
            let fail = |msg: String| {
                RagError::CorpusLoad(match &loc {
                    Some(loc) => format!("{loc}: {msg}"),
                    None => msg,
                })
            };

            if p.id.trim().is_empty() {
                return Err(fail(format!("passage #{pos} has an empty id")));
            }
            if p.text.trim().is_empty() {
                return Err(fail(format!("passage `{}` has empty text", p.id)));
            }
            if p.embedding.is_empty() {
                return Err(fail(format!("passage `{}` has an empty embedding", p.id)));
            }
            if pos == 0 {
                dim = p.embedding.len();
            } else if p.embedding.len() != dim {
                return Err(fail(format!(
                    "passage `{}` has embedding size {}, expected {dim}",
                    p.id,
                    p.embedding.len()
                )));
            }
            if p.embedding.iter().any(|x| !x.is_finite()) {
                return Err(fail(format!("passage `{}` has non-finite embedding values", p.id)));
            }
            if by_id.insert(p.id.clone(), pos).is_some() {
                return Err(fail(format!("duplicate passage id `{}`", p.id)));
            }
            passages.push(Arc::new(p));
        }

        Ok(Self {
            passages,
            by_id,
            dim,
        })
    }

    /// Fails with [`RagError::VectorSizeMismatch`] if the corpus dimension differs from `want`.
    pub fn ensure_dimension(&self, want: usize) -> Result<(), RagError> {
        if self.dim != want {
            return Err(RagError::VectorSizeMismatch {
                got: self.dim,
                want,
            });
        }
        Ok(())
    }

    /// Looks up a passage by id.
    pub fn get(&self, id: &str) -> Result<Arc<Passage>, RagError> {
        self.by_id
            .get(id)
            .map(|&pos| self.passages[pos].clone())
            .ok_or_else(|| RagError::NotFound(id.to_string()))
    }

    /// Passage at insertion position `pos`.
    pub fn passage_at(&self, pos: usize) -> Option<&Arc<Passage>> {
        self.passages.get(pos)
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Embedding size shared by all passages.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Passages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Passage>> {
        self.passages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn row(id: &str, source: &str, emb: &str) -> String {
        format!(r#"{{"id":"{id}","text":"text of {id}","source":"{source}","embedding":{emb}}}"#)
    }

    fn p(id: &str, emb: Vec<f32>) -> Passage {
        Passage {
            id: id.into(),
            text: format!("text of {id}"),
            source_reference: "doc.md".into(),
            embedding: emb,
        }
    }

    #[test]
    fn loads_directory_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("02-security.jsonl"), row("sec-1", "security.md", "[0.0,1.0]")).unwrap();
        fs::write(
            dir.path().join("01-reliability.jsonl"),
            format!("{}\n{}\n", row("rel-1", "reliability.md", "[1.0,0.0]"), row("rel-2", "reliability.md", "[0.7,0.7]")),
        )
        .unwrap();

        let store = DocumentStore::load(dir.path()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.dimension(), 2);
        let ids: Vec<_> = store.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["rel-1", "rel-2", "sec-1"]);
        assert_eq!(store.get("sec-1").unwrap().source_reference, "security.md");
    }

    #[test]
    fn load_errors_name_file_and_line() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("corpus.jsonl");
        fs::write(&path, format!("{}\n{}\n", row("a", "r.md", "[1.0,0.0]"), row("b", "r.md", "[1.0]"))).unwrap();
        let msg = DocumentStore::load(&path).unwrap_err().to_string();
        assert!(msg.contains("corpus.jsonl:2"), "{msg}");
        assert!(msg.contains("embedding size 1"), "{msg}");

        fs::write(&path, format!("{}\n{}\n", row("a", "r.md", "[1.0,0.0]"), row("a", "r.md", "[0.0,1.0]"))).unwrap();
        let msg = DocumentStore::load(&path).unwrap_err().to_string();
        assert!(msg.contains("corpus.jsonl:2"), "{msg}");
        assert!(msg.contains("duplicate"), "{msg}");
    }

    #[test]
    fn duplicate_across_files_points_at_second_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("01.jsonl"), row("x", "a.md", "[1.0]")).unwrap();
        fs::write(dir.path().join("02.jsonl"), format!("\n{}\n", row("x", "b.md", "[0.5]"))).unwrap();

        let msg = DocumentStore::load(dir.path()).unwrap_err().to_string();
        assert!(msg.contains("02.jsonl:2"), "{msg}");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = DocumentStore::from_passages(vec![p("a", vec![1.0])]).unwrap();
        assert!(matches!(store.get("zzz"), Err(RagError::NotFound(id)) if id == "zzz"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = DocumentStore::from_passages(vec![p("a", vec![1.0]), p("a", vec![0.5])]).unwrap_err();
        assert!(matches!(err, RagError::CorpusLoad(m) if m.contains("duplicate")));
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let err =
            DocumentStore::from_passages(vec![p("a", vec![1.0, 0.0]), p("b", vec![1.0])]).unwrap_err();
        assert!(matches!(err, RagError::CorpusLoad(_)));
    }

    #[test]
    fn blank_text_and_empty_embedding_are_rejected() {
        let mut blank = p("a", vec![1.0]);
        blank.text = "   ".into();
        assert!(DocumentStore::from_passages(vec![blank]).is_err());
        assert!(DocumentStore::from_passages(vec![p("b", vec![])]).is_err());
        assert!(DocumentStore::from_passages(vec![p("c", vec![f32::NAN])]).is_err());
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert!(matches!(
            DocumentStore::from_passages(Vec::new()),
            Err(RagError::CorpusLoad(_))
        ));
    }

    #[test]
    fn expected_dimension_check() {
        let store = DocumentStore::from_passages(vec![p("a", vec![1.0, 0.0, 0.0])]).unwrap();
        assert!(store.ensure_dimension(3).is_ok());
        assert!(matches!(
            store.ensure_dimension(768),
            Err(RagError::VectorSizeMismatch { got: 3, want: 768 })
        ));
    }
}
