//! Resolves a corpus source (file or directory) into the list of JSONL files to load.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use crate::errors::RagError;

/// Returns the JSONL files that make up the corpus at `source`.
///
/// - A file is returned as-is.
/// - A directory yields its `*.jsonl` entries sorted by file name, so the
///   insertion order (and therefore tie-breaking) is reproducible.
///
/// # Errors
/// [`RagError::CorpusLoad`] if the path does not exist, cannot be listed,
/// or a directory contains no `*.jsonl` file.
pub fn corpus_files(source: impl AsRef<Path>) -> Result<Vec<PathBuf>, RagError> {
    let source = source.as_ref();
    trace!("discovery::corpus_files source={:?}", source);

    if source.is_file() {
        return Ok(vec![source.to_path_buf()]);
    }
    if !source.is_dir() {
        return Err(RagError::CorpusLoad(format!(
            "corpus source {} does not exist",
            source.display()
        )));
    }

    let entries = fs::read_dir(source).map_err(|e| {
        RagError::CorpusLoad(format!("cannot list {}: {e}", source.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| RagError::CorpusLoad(format!("cannot list {}: {e}", source.display())))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "jsonl") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(RagError::CorpusLoad(format!(
            "no *.jsonl files in {}",
            source.display()
        )));
    }

    debug!("discovery::corpus_files -> {} file(s)", files.len());
    Ok(files)
}
