//! File and directory handles.
//!
//! A handle is a path plus shared references to the backend it lives on
//! and the kind catalog describing it. Handles never touch the backend at
//! construction; creation and deletion are explicit.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::backend::{Backend, FsError};
use super::kind::{ArtifactKind, KindCatalog};

/// Reference to a file on a backend, stamped with its catalog kind.
#[derive(Debug, Clone)]
pub struct FileHandle {
    backend: Arc<dyn Backend>,
    catalog: Arc<KindCatalog>,
    path: PathBuf,
    kind: ArtifactKind,
}

impl FileHandle {
    /// Create a handle for `path`, deriving the kind from the file name.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, catalog: Arc<KindCatalog>, path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let kind = catalog.kind_for_name(&name);
        Self {
            backend,
            catalog,
            path,
            kind,
        }
    }

    /// Full path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name component of the path.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Catalog kind assigned from the file extension.
    #[must_use]
    pub fn kind(&self) -> &ArtifactKind {
        &self.kind
    }

    /// Catalog this handle was created against.
    #[must_use]
    pub fn catalog(&self) -> &Arc<KindCatalog> {
        &self.catalog
    }

    /// Check whether the file exists on the backend.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.backend.exists(&self.path)
    }

    /// Create the file (empty) on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or creation
    /// fails.
    pub fn create(&self) -> Result<(), FsError> {
        self.backend.create_file(&self.path)
    }

    /// Delete the file. Absent files are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn delete(&self, recursive: bool) -> Result<(), FsError> {
        self.backend.remove(&self.path, recursive)
    }

    /// Read the full contents of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    pub fn read(&self) -> Result<Vec<u8>, FsError> {
        self.backend.read(&self.path)
    }

    /// Write `contents` to the file, creating or truncating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or the write
    /// fails.
    pub fn write(&self, contents: &[u8]) -> Result<(), FsError> {
        self.backend.write(&self.path, contents)
    }
}

/// Reference to a directory on a backend.
#[derive(Debug, Clone)]
pub struct DirHandle {
    backend: Arc<dyn Backend>,
    catalog: Arc<KindCatalog>,
    path: PathBuf,
}

impl DirHandle {
    /// Create a handle for the directory at `path`.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, catalog: Arc<KindCatalog>, path: PathBuf) -> Self {
        Self {
            backend,
            catalog,
            path,
        }
    }

    /// Full path of the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name component of the path.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Catalog this handle was created against.
    #[must_use]
    pub fn catalog(&self) -> &Arc<KindCatalog> {
        &self.catalog
    }

    /// Check whether the directory exists on the backend.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.backend.is_dir(&self.path)
    }

    /// Create the directory on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or creation
    /// fails.
    pub fn create(&self) -> Result<(), FsError> {
        self.backend.create_dir(&self.path)
    }

    /// Delete the directory; `recursive` removes its contents first.
    /// Absent directories are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    pub fn delete(&self, recursive: bool) -> Result<(), FsError> {
        self.backend.remove(&self.path, recursive)
    }

    /// Handle for a file named `name` inside this directory.
    #[must_use]
    pub fn file(&self, name: &str) -> FileHandle {
        FileHandle::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.catalog),
            self.path.join(name),
        )
    }

    /// Handle for a subdirectory named `name` inside this directory.
    #[must_use]
    pub fn subdir(&self, name: &str) -> DirHandle {
        DirHandle::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.catalog),
            self.path.join(name),
        )
    }

    /// Check whether an entry named `name` exists inside this directory.
    #[must_use]
    pub fn entry_exists(&self, name: &str) -> bool {
        self.backend.exists(&self.path.join(name))
    }

    /// Remove the entry named `name` inside this directory, recursively.
    /// Absent entries are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry exists but cannot be removed.
    pub fn remove_entry(&self, name: &str) -> Result<(), FsError> {
        self.backend.remove(&self.path.join(name), true)
    }
}
