//! Filesystem collaborator for temporary artifacts.

/// Backend trait and the on-disk implementation.
pub mod backend;
/// File and directory handles over a backend.
pub mod handle;
/// Artifact kind identifiers and the kind catalog.
pub mod kind;
/// In-memory backend for tests and embedding.
pub mod memory;

pub use backend::{Backend, DiskBackend, FsError};
pub use handle::{DirHandle, FileHandle};
pub use kind::{ArtifactKind, KindCatalog, KindError};
pub use memory::MemoryBackend;
