//! File writer for generated encoders.
//!
//! Writes are only attempted after resolution and generation have succeeded,
//! so a failed run leaves no destination artifact behind.

use crate::error::{CliResult, WriteError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// File already held the same content and was left alone.
    Unchanged {
        /// Path of the existing file.
        path: PathBuf,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    /// Create a new file writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write `content` to `path`, creating parent directories as needed.
    ///
    /// An existing file with identical content is not rewritten, which keeps
    /// its modification time stable for build scripts.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if std::fs::read_to_string(path).is_ok_and(|existing| existing == content) {
            debug!(path = %path.display(), "output unchanged");
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(path = %path.display(), bytes = content.len(), "output written");
        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. }
            | WriteResult::Unchanged { path }
            | WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the file was written by this call.
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONTENT: &str = "pub struct TagEncoder;\n";

    #[test]
    fn test_write_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tag_encoder.rs");

        let result = FileWriter::new(false).write(&path, CONTENT).unwrap();

        assert!(result.was_written());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONTENT);
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/tag_encoder.rs");

        FileWriter::new(false).write(&path, CONTENT).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_identical_content_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tag_encoder.rs");
        let writer = FileWriter::new(false);

        writer.write(&path, CONTENT).unwrap();
        let second = writer.write(&path, CONTENT).unwrap();

        assert!(matches!(second, WriteResult::Unchanged { .. }));
        assert_eq!(second.path(), path);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tag_encoder.rs");

        let writer = FileWriter::new(true);
        assert!(writer.is_dry_run());
        let result = writer.write(&path, CONTENT).unwrap();

        assert!(!path.exists());
        match result {
            WriteResult::DryRun { content, .. } => assert_eq!(content, CONTENT),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
