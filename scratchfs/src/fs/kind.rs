//! Artifact kind identifiers and the kind catalog.
//!
//! Kinds form an open-ended single-inheritance hierarchy described by an
//! explicit parent table rather than host type reflection. The resolver
//! walks this table when choosing wrapper behavior; callers extend it with
//! `define` and `bind_extension` to introduce new artifact kinds without
//! touching the resolver.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

/// Identifier of an artifact kind in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKind(String);

impl ArtifactKind {
    /// Identifier of the base file kind, the root of every file hierarchy.
    pub const FILE: &'static str = "file";
    /// Identifier of the built-in structured (JSON) file kind.
    pub const JSON_FILE: &'static str = "json-file";
    /// Identifier of the built-in directory kind.
    pub const DIRECTORY: &'static str = "directory";

    /// Create a kind identifier from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ArtifactKind {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Catalog-related errors.
#[derive(Debug, Error)]
pub enum KindError {
    /// The named kind is not present in the catalog.
    #[error("Kind '{0}' is not defined")]
    UnknownKind(String),
    /// A kind with this identifier is already defined.
    #[error("Kind '{0}' is already defined")]
    AlreadyDefined(String),
}

/// Catalog of artifact kinds: parent links plus extension bindings.
#[derive(Debug)]
pub struct KindCatalog {
    /// Kind identifier -> parent kind identifier (`None` for roots).
    parents: RwLock<HashMap<String, Option<String>>>,
    /// File extension (without the dot) -> kind identifier.
    extensions: RwLock<HashMap<String, String>>,
}

impl Default for KindCatalog {
    fn default() -> Self {
        let mut parents = HashMap::new();
        parents.insert(ArtifactKind::FILE.to_string(), None);
        parents.insert(
            ArtifactKind::JSON_FILE.to_string(),
            Some(ArtifactKind::FILE.to_string()),
        );
        parents.insert(ArtifactKind::DIRECTORY.to_string(), None);

        let mut extensions = HashMap::new();
        extensions.insert("json".to_string(), ArtifactKind::JSON_FILE.to_string());

        Self {
            parents: RwLock::new(parents),
            extensions: RwLock::new(extensions),
        }
    }
}

impl KindCatalog {
    /// Create a catalog with the built-in kinds (`file`, `json-file`,
    /// `directory`) and the `json` extension binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a kind is defined.
    #[must_use]
    pub fn contains(&self, kind: &ArtifactKind) -> bool {
        self.parents.read().contains_key(kind.as_str())
    }

    /// Look up the parent of a kind. Returns `None` for root kinds and for
    /// identifiers not present in the catalog.
    #[must_use]
    pub fn parent_of(&self, kind: &ArtifactKind) -> Option<ArtifactKind> {
        self.parents
            .read()
            .get(kind.as_str())
            .and_then(|parent| parent.as_deref().map(ArtifactKind::new))
    }

    /// Define a new kind with the given parent.
    ///
    /// # Errors
    ///
    /// Returns [`KindError::AlreadyDefined`] if `kind` exists and
    /// [`KindError::UnknownKind`] if `parent` does not.
    pub fn define(&self, kind: &ArtifactKind, parent: &ArtifactKind) -> Result<(), KindError> {
        let mut parents = self.parents.write();
        if !parents.contains_key(parent.as_str()) {
            return Err(KindError::UnknownKind(parent.to_string()));
        }
        if parents.contains_key(kind.as_str()) {
            return Err(KindError::AlreadyDefined(kind.to_string()));
        }
        parents.insert(
            kind.as_str().to_string(),
            Some(parent.as_str().to_string()),
        );
        Ok(())
    }

    /// Bind a file extension (without the dot) to a kind, replacing any
    /// previous binding for that extension.
    ///
    /// # Errors
    ///
    /// Returns [`KindError::UnknownKind`] if `kind` is not defined.
    pub fn bind_extension(&self, extension: &str, kind: &ArtifactKind) -> Result<(), KindError> {
        if !self.contains(kind) {
            return Err(KindError::UnknownKind(kind.to_string()));
        }
        self.extensions
            .write()
            .insert(
                extension.trim_start_matches('.').to_string(),
                kind.as_str().to_string(),
            );
        Ok(())
    }

    /// Derive the kind of a file from its name. Falls back to the base
    /// file kind for unknown or missing extensions.
    #[must_use]
    pub fn kind_for_name(&self, file_name: &str) -> ArtifactKind {
        file_name
            .rsplit_once('.')
            .and_then(|(_, ext)| {
                self.extensions
                    .read()
                    .get(ext)
                    .map(|kind| ArtifactKind::new(kind.as_str()))
            })
            .unwrap_or_else(|| ArtifactKind::new(ArtifactKind::FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_hierarchy() {
        let catalog = KindCatalog::new();
        let json = ArtifactKind::new(ArtifactKind::JSON_FILE);
        assert!(catalog.contains(&json));
        assert_eq!(
            catalog.parent_of(&json),
            Some(ArtifactKind::new(ArtifactKind::FILE))
        );
        assert_eq!(
            catalog.parent_of(&ArtifactKind::new(ArtifactKind::FILE)),
            None
        );
    }

    #[test]
    fn test_define_rejects_duplicates_and_unknown_parents() {
        let catalog = KindCatalog::new();
        let sheet = ArtifactKind::new("spreadsheet-file");

        assert!(catalog
            .define(&sheet, &ArtifactKind::new(ArtifactKind::FILE))
            .is_ok());
        assert!(matches!(
            catalog.define(&sheet, &ArtifactKind::new(ArtifactKind::FILE)),
            Err(KindError::AlreadyDefined(_))
        ));
        assert!(matches!(
            catalog.define(&ArtifactKind::new("orphan"), &ArtifactKind::new("missing")),
            Err(KindError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_kind_from_extension() -> anyhow::Result<()> {
        let catalog = KindCatalog::new();
        assert_eq!(
            catalog.kind_for_name("abc123.json").as_str(),
            ArtifactKind::JSON_FILE
        );
        assert_eq!(catalog.kind_for_name("abc123.txt").as_str(), ArtifactKind::FILE);
        assert_eq!(catalog.kind_for_name("abc123").as_str(), ArtifactKind::FILE);

        let sheet = ArtifactKind::new("spreadsheet-file");
        catalog.define(&sheet, &ArtifactKind::new(ArtifactKind::FILE))?;
        catalog.bind_extension("xlsx", &sheet)?;
        assert_eq!(catalog.kind_for_name("report.xlsx"), sheet);
        Ok(())
    }
}
