//! scratchfs - Self-cleaning temporary files and directories.
//!
//! This crate generates uniquely named files and directories under a
//! configured root, wraps them in handles that delete the underlying
//! artifact when dropped, and groups generated artifacts into rollback
//! checkpoints so that everything created after a checkpoint can be
//! discarded in one call.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Filesystem backends, artifact handles, and the kind catalog.
pub mod fs;
/// Resolution of artifact kinds to wrapper behaviors.
pub mod resolver;
/// The `Temporary` facade, checkpoint engine, and self-cleaning wrappers.
pub mod temporary;

pub use fs::{
    ArtifactKind, Backend, DirHandle, DiskBackend, FileHandle, FsError, KindCatalog, KindError,
    MemoryBackend,
};
pub use resolver::{ResolverError, TypeResolver, WrapperKind};
pub use temporary::{CheckpointToken, TempDir, TempFile, Temporary};
