//! Self-cleaning wrappers around generated artifacts.
//!
//! Each wrapper exclusively owns the lifetime decision for one generated
//! name: when it is dropped, explicitly or at end of scope, the underlying
//! artifact is deleted recursively. Deletion is idempotent, so an explicit
//! `discard` followed by the automatic drop is a no-op the second time.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::fs::{ArtifactKind, DirHandle, FileHandle, FsError};
use crate::resolver::WrapperKind;

/// A generated file that deletes itself when dropped.
#[derive(Debug)]
pub struct TempFile {
    handle: FileHandle,
    wrapper: WrapperKind,
}

impl TempFile {
    pub(crate) fn new(handle: FileHandle, wrapper: WrapperKind) -> Self {
        Self { handle, wrapper }
    }

    /// Full path of the file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        self.handle.path()
    }

    /// Generated file name, including any extension.
    #[must_use]
    pub fn name(&self) -> String {
        self.handle.name()
    }

    /// Catalog kind derived from the extension.
    #[must_use]
    pub fn kind(&self) -> &ArtifactKind {
        self.handle.kind()
    }

    /// Wrapper behavior chosen by the resolver.
    #[must_use]
    pub fn wrapper_kind(&self) -> WrapperKind {
        self.wrapper
    }

    /// Check whether the file exists on the backend.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.handle.exists()
    }

    /// Create the file (empty) on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or creation
    /// fails.
    pub fn create(&self) -> Result<(), FsError> {
        self.handle.create()
    }

    /// Read the full contents of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    pub fn read(&self) -> Result<Vec<u8>, FsError> {
        self.handle.read()
    }

    /// Write `contents` to the file, creating or truncating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write(&self, contents: &[u8]) -> Result<(), FsError> {
        self.handle.write(contents)
    }

    /// Serialize `value` as pretty JSON into the file. Only available on
    /// structured wrappers.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotStructured`] for non-structured wrappers and
    /// propagates serialization or write failures.
    pub fn write_json<T: Serialize>(&self, value: &T) -> Result<(), FsError> {
        if self.wrapper != WrapperKind::Structured {
            return Err(FsError::NotStructured(self.handle.path().to_path_buf()));
        }
        let contents = serde_json::to_vec_pretty(value).map_err(|e| FsError::Json {
            path: self.handle.path().to_path_buf(),
            source: e,
        })?;
        self.handle.write(&contents)
    }

    /// Deserialize the file's JSON contents. Only available on structured
    /// wrappers.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotStructured`] for non-structured wrappers and
    /// propagates read or parse failures.
    pub fn read_json<T: DeserializeOwned>(&self) -> Result<T, FsError> {
        if self.wrapper != WrapperKind::Structured {
            return Err(FsError::NotStructured(self.handle.path().to_path_buf()));
        }
        let contents = self.handle.read()?;
        serde_json::from_slice(&contents).map_err(|e| FsError::Json {
            path: self.handle.path().to_path_buf(),
            source: e,
        })
    }

    /// Delete the file now instead of waiting for scope exit. Absent
    /// files are a no-op, so the automatic drop firing later is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn discard(&self) -> Result<(), FsError> {
        self.handle.delete(true)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Err(error) = self.handle.delete(true) {
            warn!(
                "Failed to delete temporary file {:?}: {error}",
                self.handle.path()
            );
        }
    }
}

/// A generated directory that deletes itself, and its contents, when
/// dropped.
#[derive(Debug)]
pub struct TempDir {
    handle: DirHandle,
}

impl TempDir {
    pub(crate) fn new(handle: DirHandle) -> Self {
        Self { handle }
    }

    /// Full path of the directory.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        self.handle.path()
    }

    /// Generated directory name.
    #[must_use]
    pub fn name(&self) -> String {
        self.handle.name()
    }

    /// Check whether the directory exists on the backend.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.handle.exists()
    }

    /// Create the directory on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory is missing or creation
    /// fails.
    pub fn create(&self) -> Result<(), FsError> {
        self.handle.create()
    }

    /// Handle for a file named `name` inside this directory. The file is
    /// not self-cleaning on its own; it goes away with the directory.
    #[must_use]
    pub fn file(&self, name: &str) -> FileHandle {
        self.handle.file(name)
    }

    /// Handle for a subdirectory named `name` inside this directory.
    #[must_use]
    pub fn subdir(&self, name: &str) -> DirHandle {
        self.handle.subdir(name)
    }

    /// Delete the directory and its contents now instead of waiting for
    /// scope exit. Absent directories are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    pub fn discard(&self) -> Result<(), FsError> {
        self.handle.delete(true)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if let Err(error) = self.handle.delete(true) {
            warn!(
                "Failed to delete temporary directory {:?}: {error}",
                self.handle.path()
            );
        }
    }
}
