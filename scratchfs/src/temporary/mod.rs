//! Temporary artifact facade, checkpoint engine, and wrappers.

/// Name generation and checkpoint tracking.
pub mod engine;
/// Self-cleaning file and directory wrappers.
pub mod wrapper;

pub use engine::{CheckpointToken, Temporary};
pub use wrapper::{TempDir, TempFile};
