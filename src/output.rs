//! Writing exported documents to disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::graph::D3Document;
use crate::DEFAULT_OUTPUT_FILENAME;

/// Error type for output operations.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// A parent directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document could not be encoded.
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Final path for an output argument.
///
/// An existing directory gets [`DEFAULT_OUTPUT_FILENAME`] appended. Anything
/// else is used as given.
pub fn resolve_output_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DEFAULT_OUTPUT_FILENAME)
    } else {
        path.to_path_buf()
    }
}

/// Write `document` as JSON to `path`, creating parent directories.
///
/// Returns the path actually written.
pub fn write_document(path: &Path, document: &D3Document) -> Result<PathBuf, OutputError> {
    let path = resolve_output_path(path);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source| OutputError::Write {
        path: path.clone(),
        source,
    };

    let file = File::create(&path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    document.write_to(&mut writer)?;
    writer.flush().map_err(write_err)?;

    info!(
        path = %path.display(),
        nodes = document.nodes.len(),
        links = document.links.len(),
        "Wrote graph"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use tempfile::TempDir;

    fn document() -> D3Document {
        let mut graph = Graph::new();
        graph.add_node("A");
        graph.add_node("B");
        graph.add_edge("A", "B");
        graph.to_d3()
    }

    #[test]
    fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        let written = write_document(&path, &document()).unwrap();

        assert_eq!(written, path);
        let text = fs::read_to_string(&path).unwrap();
        let parsed: D3Document = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, document());
    }

    #[test]
    fn test_directory_gets_default_filename() {
        let dir = TempDir::new().unwrap();

        let written = write_document(dir.path(), &document()).unwrap();

        assert_eq!(written, dir.path().join(DEFAULT_OUTPUT_FILENAME));
        assert!(written.is_file());
    }

    #[test]
    fn test_parents_are_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("nested").join("graph.json");

        write_document(&path, &document()).unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, "stale contents that are longer than the new document").unwrap();

        write_document(&path, &D3Document::default()).unwrap();

        let parsed: D3Document =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, D3Document::default());
    }

    #[test]
    fn test_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let err = write_document(&blocker.join("graph.json"), &document()).unwrap_err();
        assert!(matches!(err, OutputError::CreateDir { .. }));
    }
}
