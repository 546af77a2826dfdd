//! The `Temporary` facade and its checkpoint engine.
//!
//! `Temporary` generates uniquely named artifacts under a root directory
//! and records every generated name into all currently open checkpoints.
//! Rolling back a checkpoint deletes whatever it recorded that still
//! exists; everything else is skipped. Checkpoint bookkeeping survives
//! rollback, so repeated and overlapping rollbacks are harmless.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::fs::{DirHandle, FsError};
use crate::resolver::TypeResolver;

use super::wrapper::{TempDir, TempFile};

/// Opaque token identifying an open checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckpointToken(String);

impl CheckpointToken {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CheckpointToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Facade for generating self-cleaning artifacts under a root directory.
#[derive(Debug)]
pub struct Temporary {
    root: DirHandle,
    resolver: Arc<TypeResolver>,
    /// Open checkpoints: token -> names recorded since it was opened.
    trackers: Mutex<HashMap<String, Vec<String>>>,
}

impl Temporary {
    /// Create a facade over `root` with its own resolver.
    #[must_use]
    pub fn new(root: DirHandle) -> Self {
        let resolver = Arc::new(TypeResolver::new(Arc::clone(root.catalog())));
        Self::with_resolver(root, resolver)
    }

    /// Create a facade over `root` sharing `resolver`, for callers that
    /// want one resolver across several `Temporary` instances.
    #[must_use]
    pub fn with_resolver(root: DirHandle, resolver: Arc<TypeResolver>) -> Self {
        Self {
            root,
            resolver,
            trackers: Mutex::new(HashMap::new()),
        }
    }

    /// Resolver in use by this facade.
    #[must_use]
    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// Root directory the generated names resolve under.
    #[must_use]
    pub fn root(&self) -> &DirHandle {
        &self.root
    }

    /// Record a generated name into every currently open checkpoint.
    fn record(&self, name: &str) {
        let mut trackers = self.trackers.lock();
        for names in trackers.values_mut() {
            names.push(name.to_string());
        }
    }

    /// Generate a uniquely named directory under the root. The directory
    /// is not created on the backend; call [`TempDir::create`] for that.
    #[must_use]
    pub fn new_directory(&self) -> TempDir {
        let name = Uuid::new_v4().to_string();
        self.record(&name);
        debug!("Generated temporary directory name {name}");
        TempDir::new(self.root.subdir(&name))
    }

    /// Generate a uniquely named file under the root. `extension` is
    /// normalized: leading dots are stripped and a single dot is prefixed
    /// when non-empty, so `"txt"` and `".txt"` are equivalent. The wrapper
    /// behavior is chosen by the resolver from the extension-derived kind.
    /// The file is not created on the backend; call [`TempFile::create`].
    #[must_use]
    pub fn new_file(&self, extension: &str) -> TempFile {
        let extension = extension.trim_start_matches('.');
        let name = if extension.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            format!("{}.{extension}", Uuid::new_v4())
        };
        self.record(&name);

        let handle = self.root.file(&name);
        let wrapper = self.resolver.resolve(&handle);
        debug!("Generated temporary file name {name} ({wrapper} wrapper)");
        TempFile::new(handle, wrapper)
    }

    /// Open a new checkpoint. Every name generated from now on is
    /// recorded against the returned token, in addition to any other open
    /// checkpoints.
    #[instrument(skip(self))]
    pub fn track(&self) -> CheckpointToken {
        let token = CheckpointToken::generate();
        self.trackers
            .lock()
            .insert(token.as_str().to_string(), Vec::new());
        debug!("Opened checkpoint {token}");
        token
    }

    /// Delete every artifact recorded under `token` that still exists.
    /// Absent artifacts are skipped, an unknown or already rolled back
    /// token is a no-op, and the checkpoint's bookkeeping is left intact,
    /// so calling this twice is safe.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend fails to remove an existing
    /// artifact.
    #[instrument(skip(self))]
    pub fn rollback(&self, token: &CheckpointToken) -> Result<(), FsError> {
        let names = {
            let trackers = self.trackers.lock();
            match trackers.get(token.as_str()) {
                Some(names) => names.clone(),
                None => {
                    debug!("Rollback for unknown checkpoint {token}, nothing to do");
                    return Ok(());
                }
            }
        };

        let mut removed = 0_usize;
        for name in &names {
            if self.root.entry_exists(name) {
                self.root.remove_entry(name)?;
                removed += 1;
            }
        }

        info!(
            "Rolled back checkpoint {token}: removed {removed} of {} recorded artifacts",
            names.len()
        );
        Ok(())
    }
}
