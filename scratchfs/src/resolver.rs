//! Resolution of artifact kinds to wrapper behaviors.
//!
//! The resolver keeps a mapping from catalog kinds to [`WrapperKind`]
//! tags. Lookups walk the kind's ancestry in the catalog, so unregistered
//! kinds degrade to their nearest registered ancestor, and ultimately to
//! the base file entry, which is always present.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::fs::{ArtifactKind, FileHandle, KindCatalog};

/// Behavior applied to a generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    /// Plain file: byte-level read/write, recursive delete on drop.
    Basic,
    /// Structured (JSON) file: adds typed read/write helpers.
    Structured,
    /// Directory: recursive delete on drop removes contents.
    Directory,
}

impl std::fmt::Display for WrapperKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WrapperKind::Basic => write!(f, "basic"),
            WrapperKind::Structured => write!(f, "structured"),
            WrapperKind::Directory => write!(f, "directory"),
        }
    }
}

/// Resolver-related errors.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The kind argument is not defined in the catalog.
    #[error("Kind '{0}' does not exist")]
    UnknownKind(String),
    /// `register` called for a kind that already has a mapping.
    #[error("Kind '{0}' already set up")]
    AlreadyRegistered(String),
    /// `replace` called for a kind that has no mapping.
    #[error("Kind '{0}' has not been set up")]
    NotRegistered(String),
}

/// Maps catalog kinds to wrapper behaviors via nearest-ancestor lookup.
#[derive(Debug)]
pub struct TypeResolver {
    catalog: Arc<KindCatalog>,
    map: RwLock<HashMap<String, WrapperKind>>,
}

impl TypeResolver {
    /// Create a resolver over `catalog` with the built-in entries:
    /// `file` -> [`WrapperKind::Basic`] (the permanent default) and
    /// `json-file` -> [`WrapperKind::Structured`].
    #[must_use]
    pub fn new(catalog: Arc<KindCatalog>) -> Self {
        let mut map = HashMap::new();
        map.insert(ArtifactKind::FILE.to_string(), WrapperKind::Basic);
        map.insert(ArtifactKind::JSON_FILE.to_string(), WrapperKind::Structured);
        Self {
            catalog,
            map: RwLock::new(map),
        }
    }

    /// Catalog this resolver consults for ancestry.
    #[must_use]
    pub fn catalog(&self) -> &Arc<KindCatalog> {
        &self.catalog
    }

    /// Add a mapping for a kind that has none yet.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::UnknownKind`] if `kind` is not defined in
    /// the catalog and [`ResolverError::AlreadyRegistered`] if it already
    /// has a mapping.
    pub fn register(&self, kind: &ArtifactKind, wrapper: WrapperKind) -> Result<(), ResolverError> {
        if !self.catalog.contains(kind) {
            return Err(ResolverError::UnknownKind(kind.to_string()));
        }
        let mut map = self.map.write();
        if map.contains_key(kind.as_str()) {
            return Err(ResolverError::AlreadyRegistered(kind.to_string()));
        }
        map.insert(kind.as_str().to_string(), wrapper);
        Ok(())
    }

    /// Overwrite the mapping for an already-registered kind. The built-in
    /// `file` entry counts as registered, so the default fallback can be
    /// replaced but never removed.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::UnknownKind`] if `kind` is not defined in
    /// the catalog and [`ResolverError::NotRegistered`] if it has no
    /// mapping.
    pub fn replace(&self, kind: &ArtifactKind, wrapper: WrapperKind) -> Result<(), ResolverError> {
        if !self.catalog.contains(kind) {
            return Err(ResolverError::UnknownKind(kind.to_string()));
        }
        let mut map = self.map.write();
        if !map.contains_key(kind.as_str()) {
            return Err(ResolverError::NotRegistered(kind.to_string()));
        }
        map.insert(kind.as_str().to_string(), wrapper);
        Ok(())
    }

    /// Resolve the wrapper behavior for a file handle by walking its kind
    /// ancestry: the handle's own kind, then its parent, and so on. A kind
    /// whose chain ends unmapped resolves to the default `file` entry.
    #[must_use]
    pub fn resolve(&self, handle: &FileHandle) -> WrapperKind {
        let map = self.map.read();
        let mut cursor = Some(handle.kind().clone());
        while let Some(kind) = cursor {
            if let Some(wrapper) = map.get(kind.as_str()) {
                return *wrapper;
            }
            cursor = self.catalog.parent_of(&kind);
        }
        // Chain exhausted without a mapping; the default entry is
        // permanent, so this lookup cannot miss.
        map[ArtifactKind::FILE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{DirHandle, MemoryBackend};
    use std::path::PathBuf;

    fn fixture() -> (DirHandle, Arc<KindCatalog>) {
        let backend = Arc::new(MemoryBackend::new());
        backend.create_dir_all(std::path::Path::new("/test"));
        let catalog = Arc::new(KindCatalog::new());
        let root = DirHandle::new(backend, Arc::clone(&catalog), PathBuf::from("/test"));
        (root, catalog)
    }

    #[test]
    fn test_resolves_basic_file() {
        let (root, catalog) = fixture();
        let resolver = TypeResolver::new(catalog);
        assert_eq!(resolver.resolve(&root.file("filename")), WrapperKind::Basic);
    }

    #[test]
    fn test_resolves_structured_file() {
        let (root, catalog) = fixture();
        let resolver = TypeResolver::new(catalog);
        assert_eq!(
            resolver.resolve(&root.file("filename.json")),
            WrapperKind::Structured
        );
    }

    #[test]
    fn test_unregistered_kind_falls_back_to_basic() -> anyhow::Result<()> {
        let (root, catalog) = fixture();
        let sheet = ArtifactKind::new("spreadsheet-file");
        catalog.define(&sheet, &ArtifactKind::new(ArtifactKind::FILE))?;
        catalog.bind_extension("xlsx", &sheet)?;

        let resolver = TypeResolver::new(catalog);
        assert_eq!(resolver.resolve(&root.file("report.xlsx")), WrapperKind::Basic);
        Ok(())
    }

    #[test]
    fn test_kind_with_no_registered_ancestor_uses_default_entry() -> anyhow::Result<()> {
        let (root, catalog) = fixture();
        // A kind rooted outside the file hierarchy has no registered
        // ancestor anywhere in its chain; resolution lands on the
        // default entry.
        let bundle = ArtifactKind::new("bundle");
        catalog.define(&bundle, &ArtifactKind::new(ArtifactKind::DIRECTORY))?;
        catalog.bind_extension("bundle", &bundle)?;

        let resolver = TypeResolver::new(catalog);
        assert_eq!(resolver.resolve(&root.file("pack.bundle")), WrapperKind::Basic);
        Ok(())
    }

    #[test]
    fn test_registered_kind_resolves_exactly() -> anyhow::Result<()> {
        let (root, catalog) = fixture();
        let sheet = ArtifactKind::new("spreadsheet-file");
        catalog.define(&sheet, &ArtifactKind::new(ArtifactKind::FILE))?;
        catalog.bind_extension("xlsx", &sheet)?;

        let resolver = TypeResolver::new(catalog);
        resolver.register(&sheet, WrapperKind::Structured)?;
        assert_eq!(
            resolver.resolve(&root.file("report.xlsx")),
            WrapperKind::Structured
        );
        Ok(())
    }

    #[test]
    fn test_register_unknown_kind() {
        let (_, catalog) = fixture();
        let resolver = TypeResolver::new(catalog);
        let result = resolver.register(&ArtifactKind::new("unknown"), WrapperKind::Basic);
        assert!(matches!(result, Err(ResolverError::UnknownKind(_))));
    }

    #[test]
    fn test_register_kind_already_set_up() {
        let (_, catalog) = fixture();
        let resolver = TypeResolver::new(catalog);
        let result = resolver.register(
            &ArtifactKind::new(ArtifactKind::FILE),
            WrapperKind::Structured,
        );
        assert!(matches!(result, Err(ResolverError::AlreadyRegistered(_))));
    }

    #[test]
    fn test_replace_unknown_kind() {
        let (_, catalog) = fixture();
        let resolver = TypeResolver::new(catalog);
        let result = resolver.replace(&ArtifactKind::new("unknown"), WrapperKind::Basic);
        assert!(matches!(result, Err(ResolverError::UnknownKind(_))));
    }

    #[test]
    fn test_replace_kind_not_set_up() -> anyhow::Result<()> {
        let (_, catalog) = fixture();
        let sheet = ArtifactKind::new("spreadsheet-file");
        catalog.define(&sheet, &ArtifactKind::new(ArtifactKind::FILE))?;

        let resolver = TypeResolver::new(catalog);
        let result = resolver.replace(&sheet, WrapperKind::Structured);
        assert!(matches!(result, Err(ResolverError::NotRegistered(_))));
        Ok(())
    }

    #[test]
    fn test_replacing_default_entry_changes_fallback() -> anyhow::Result<()> {
        let (root, catalog) = fixture();
        let sheet = ArtifactKind::new("spreadsheet-file");
        catalog.define(&sheet, &ArtifactKind::new(ArtifactKind::FILE))?;
        catalog.bind_extension("xlsx", &sheet)?;

        let resolver = TypeResolver::new(Arc::clone(&catalog));
        resolver.replace(&ArtifactKind::new(ArtifactKind::FILE), WrapperKind::Structured)?;

        // Exact base-kind files and unregistered descendants both pick up
        // the replacement.
        assert_eq!(
            resolver.resolve(&root.file("filename")),
            WrapperKind::Structured
        );
        assert_eq!(
            resolver.resolve(&root.file("report.xlsx")),
            WrapperKind::Structured
        );
        Ok(())
    }

    #[test]
    fn test_descendant_of_structured_kind_resolves_structured() -> anyhow::Result<()> {
        let (root, catalog) = fixture();
        // A config file is a JSON file; with no mapping of its own it
        // inherits the structured behavior from its parent.
        let config = ArtifactKind::new("config-file");
        catalog.define(&config, &ArtifactKind::new(ArtifactKind::JSON_FILE))?;
        catalog.bind_extension("conf", &config)?;

        let resolver = TypeResolver::new(catalog);
        assert_eq!(
            resolver.resolve(&root.file("settings.conf")),
            WrapperKind::Structured
        );
        Ok(())
    }
}
