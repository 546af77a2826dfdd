//! Narrow filesystem seam used by handles and the checkpoint engine.
//!
//! Backends expose existence checks, creation, reads/writes, and an
//! idempotent recursive remove. Everything above this trait is backend
//! agnostic, which is what lets the unit tests run against an in-memory
//! tree while production code runs against the disk.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by filesystem backends and artifact handles.
#[derive(Debug, Error)]
pub enum FsError {
    /// An underlying I/O operation failed.
    #[error("I/O failure at '{path}': {source}")]
    Io {
        /// Path the operation was applied to.
        path: PathBuf,
        /// Source error.
        #[source]
        source: std::io::Error,
    },
    /// A file or directory was created under a parent that does not exist.
    #[error("Parent directory missing for '{0}'")]
    MissingParent(PathBuf),
    /// A JSON operation was attempted on a file not wrapped as structured.
    #[error("Not a structured file: '{0}'")]
    NotStructured(PathBuf),
    /// JSON serialization or parsing failed.
    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        /// Path of the offending file.
        path: PathBuf,
        /// Source error.
        #[source]
        source: serde_json::Error,
    },
}

/// Filesystem operations required by artifact handles.
///
/// `remove` must be idempotent: removing an absent path is `Ok(())`, never
/// an error. Rollback and drop-on-scope-exit rely on this.
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// Check whether a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check whether a path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create an empty file at `path` (touch). No-op if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or the file
    /// cannot be created.
    fn create_file(&self, path: &Path) -> Result<(), FsError>;

    /// Create a directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or the
    /// directory cannot be created.
    fn create_dir(&self, path: &Path) -> Result<(), FsError>;

    /// Read the full contents of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError>;

    /// Write `contents` to a file, creating or truncating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or the file
    /// cannot be written.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError>;

    /// Remove a path. Directories require `recursive` to be removed with
    /// their contents. Absent paths are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists but cannot be removed.
    fn remove(&self, path: &Path, recursive: bool) -> Result<(), FsError>;
}

fn io_err(path: &Path, source: std::io::Error) -> FsError {
    FsError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<(), FsError> {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() || parent.exists() => Ok(()),
        Some(_) => Err(FsError::MissingParent(path.to_path_buf())),
        None => Ok(()),
    }
}

/// Backend over the real filesystem via `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskBackend;

impl DiskBackend {
    /// Create a new disk backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Backend for DiskBackend {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_file(&self, path: &Path) -> Result<(), FsError> {
        ensure_parent(path)?;
        // Append mode so an existing file is left untouched.
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(|_| ())
            .map_err(|e| io_err(path, e))
    }

    fn create_dir(&self, path: &Path) -> Result<(), FsError> {
        ensure_parent(path)?;
        fs::create_dir(path).map_err(|e| io_err(path, e))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        fs::read(path).map_err(|e| io_err(path, e))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        let mut file = fs::File::create(path).map_err(|e| io_err(path, e))?;
        file.write_all(contents).map_err(|e| io_err(path, e))
    }

    fn remove(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
        if !path.exists() {
            return Ok(());
        }
        if path.is_dir() {
            if recursive {
                fs::remove_dir_all(path).map_err(|e| io_err(path, e))
            } else {
                fs::remove_dir(path).map_err(|e| io_err(path, e))
            }
        } else {
            fs::remove_file(path).map_err(|e| io_err(path, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_dir_requires_parent() -> anyhow::Result<()> {
        let root = tempdir()?;
        let backend = DiskBackend::new();

        let result = backend.create_dir(&root.path().join("missing/sub"));
        assert!(matches!(result, Err(FsError::MissingParent(_))));

        backend.create_dir(&root.path().join("present"))?;
        assert!(backend.is_dir(&root.path().join("present")));
        Ok(())
    }

    #[test]
    fn test_create_file_requires_parent() -> anyhow::Result<()> {
        let root = tempdir()?;
        let backend = DiskBackend::new();

        let result = backend.create_file(&root.path().join("missing/file.txt"));
        assert!(matches!(result, Err(FsError::MissingParent(_))));

        backend.create_file(&root.path().join("file.txt"))?;
        assert!(backend.exists(&root.path().join("file.txt")));
        Ok(())
    }

    #[test]
    fn test_remove_is_idempotent() -> anyhow::Result<()> {
        let root = tempdir()?;
        let backend = DiskBackend::new();
        let path = root.path().join("file.txt");

        backend.create_file(&path)?;
        backend.remove(&path, true)?;
        assert!(!backend.exists(&path));
        backend.remove(&path, true)?;
        Ok(())
    }
}
