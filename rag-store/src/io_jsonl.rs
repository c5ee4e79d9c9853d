//! Strict JSONL reader for pre-chunked corpus files.
//!
//! One JSON object per line:
//! `{ "id": "...", "text": "...", "source": "...", "embedding": [0.1, ...] }`.
//! `source_reference` is accepted in place of `source`. Empty lines are skipped;
//! any malformed line fails the whole file, with a `path:line` location.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::errors::RagError;
use crate::record::Passage;

/// Internal row shape mirrored from the corpus build pipeline.
#[derive(Deserialize)]
struct StrictRow {
    id: String,
    text: String,
    #[serde(alias = "source_reference")]
    source: String,
    embedding: Vec<f32>,
}

/// A parsed row together with the file and 1-based line it came from.
#[derive(Debug)]
pub(crate) struct Located<T> {
    pub path: PathBuf,
    pub line: usize,
    pub value: T,
}

impl<T> Located<T> {
    /// `path:line` prefix for error messages.
    pub fn location(&self) -> String {
        format!("{}:{}", self.path.display(), self.line)
    }
}

/// Reads every passage of one JSONL file, in file order.
///
/// # Errors
/// [`RagError::CorpusLoad`] if the file cannot be read or a row does not parse.
/// Semantic checks (duplicates, dimensions) belong to the document store.
pub fn read_passages(path: &Path) -> Result<Vec<Passage>, RagError> {
    Ok(read_located(path)?.into_iter().map(|row| row.value).collect())
}

/// Same as [`read_passages`], keeping each row's `path:line`.
pub(crate) fn read_located(path: &Path) -> Result<Vec<Located<Passage>>, RagError> {
    let file = File::open(path)
        .map_err(|e| RagError::CorpusLoad(format!("cannot open {}: {e}", path.display())))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            RagError::CorpusLoad(format!("{}:{}: read error: {e}", path.display(), i + 1))
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let row: StrictRow = serde_json::from_str(&line).map_err(|e| {
            RagError::CorpusLoad(format!("{}:{}: {e}", path.display(), i + 1))
        })?;

        out.push(Located {
            path: path.to_path_buf(),
            line: i + 1,
            value: Passage {
                id: row.id,
                text: row.text,
                source_reference: row.source,
                embedding: row.embedding,
            },
        });
    }

    debug!(path = %path.display(), rows = out.len(), "read corpus file");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_rows_and_skips_blank_lines() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"{{"id":"a","text":"S3","source":"reliability.md","embedding":[1.0,0.0]}}"#).unwrap();
        writeln!(f).unwrap();
        writeln!(
            f,
            r#"{{"id":"b","text":"EC2","source_reference":"performance.md","embedding":[0.0,1.0]}}"#
        )
        .unwrap();

        let rows = read_passages(f.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].source_reference, "performance.md");
    }

    #[test]
    fn malformed_row_reports_line_number() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"{{"id":"a","text":"S3","source":"r.md","embedding":[1.0]}}"#).unwrap();
        writeln!(f, r#"{{"id":"b","text":"no embedding","source":"r.md"}}"#).unwrap();

        let err = read_passages(f.path()).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, RagError::CorpusLoad(_)));
        assert!(msg.contains(":2:"), "{msg}");
    }

    #[test]
    fn located_rows_keep_their_line_numbers() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f).unwrap();
        writeln!(f, r#"{{"id":"a","text":"S3","source":"r.md","embedding":[1.0]}}"#).unwrap();

        let rows = read_located(f.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 2);
        assert!(rows[0].location().ends_with(":2"));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = read_passages(Path::new("/definitely/not/here.jsonl")).unwrap_err();
        assert!(matches!(err, RagError::CorpusLoad(_)));
    }
}
