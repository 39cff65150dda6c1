//! Declaration source discovery.
//!
//! Walks a directory tree and loads every `.rs` file beneath it, respecting
//! `.gitignore` and an optional glob filter. Entries are visited in file-name
//! order so that duplicate type names shadow each other the same way on every
//! run.

use crate::error::{CliResult, ScanError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A discovered source file with its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file as discovered under the scan root.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

impl SourceFile {
    /// Create an in-memory source, mainly for tests and build scripts.
    pub fn from_string(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            relative_path: path.clone(),
            path,
            content: content.into(),
        }
    }
}

/// Scanner for discovering declaration sources.
#[derive(Debug)]
pub struct SourceScanner {
    /// Root directory (or single file) to scan.
    root: PathBuf,

    /// Optional glob filter pattern.
    filter: Option<glob::Pattern>,
}

impl SourceScanner {
    /// Create a new scanner for the given root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: None,
        }
    }

    /// Only include files whose path relative to the root matches `pattern`.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Scan the root and return all discovered Rust files.
    ///
    /// Fails with [`ScanError::NoRustFiles`] if nothing matched.
    pub fn scan(&self) -> CliResult<Vec<SourceFile>> {
        if !self.root.exists() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() || path.extension().map_or(true, |ext| ext != "rs") {
                continue;
            }

            let relative_path = self.relative_path(path);
            if let Some(ref pattern) = self.filter {
                if !pattern.matches_path(&relative_path) {
                    trace!(path = %relative_path.display(), "skipped by filter");
                    continue;
                }
            }

            let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            trace!(path = %relative_path.display(), bytes = content.len(), "loaded source");

            files.push(SourceFile {
                path: path.to_path_buf(),
                relative_path,
                content,
            });
        }

        debug!(root = %self.root.display(), count = files.len(), "scan complete");

        if files.is_empty() {
            return Err(ScanError::no_rust_files(self.root.clone()).into());
        }

        Ok(files)
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.root) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
            // Scanning a single file strips the whole path.
            _ => path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| path.to_path_buf()),
        }
    }
}
