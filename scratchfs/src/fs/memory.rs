//! In-memory backend.
//!
//! Stores a flat path -> node map behind a `parking_lot::RwLock`. Used by
//! the unit tests and by embedders that want temporary-artifact semantics
//! without touching the disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::backend::{Backend, FsError};

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Directory,
}

/// Backend over an in-memory tree.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    nodes: RwLock<HashMap<PathBuf, Node>>,
}

impl MemoryBackend {
    /// Create a new, empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory and any missing ancestors. Intended for seeding
    /// a root before handing the backend to a [`crate::Temporary`].
    pub fn create_dir_all(&self, path: &Path) {
        let mut nodes = self.nodes.write();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            nodes
                .entry(current.clone())
                .or_insert(Node::Directory);
        }
    }

    fn parent_exists(nodes: &HashMap<PathBuf, Node>, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => true,
            // The filesystem root always exists.
            Some(parent) if parent.parent().is_none() => true,
            Some(parent) => matches!(nodes.get(parent), Some(Node::Directory)),
            None => true,
        }
    }
}

impl Backend for MemoryBackend {
    fn exists(&self, path: &Path) -> bool {
        self.nodes.read().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.read().get(path), Some(Node::Directory))
    }

    fn create_file(&self, path: &Path) -> Result<(), FsError> {
        let mut nodes = self.nodes.write();
        if !Self::parent_exists(&nodes, path) {
            return Err(FsError::MissingParent(path.to_path_buf()));
        }
        nodes
            .entry(path.to_path_buf())
            .or_insert_with(|| Node::File(Vec::new()));
        Ok(())
    }

    fn create_dir(&self, path: &Path) -> Result<(), FsError> {
        let mut nodes = self.nodes.write();
        if !Self::parent_exists(&nodes, path) {
            return Err(FsError::MissingParent(path.to_path_buf()));
        }
        nodes.insert(path.to_path_buf(), Node::Directory);
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        match self.nodes.read().get(path) {
            Some(Node::File(contents)) => Ok(contents.clone()),
            _ => Err(FsError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        let mut nodes = self.nodes.write();
        if !Self::parent_exists(&nodes, path) {
            return Err(FsError::MissingParent(path.to_path_buf()));
        }
        if matches!(nodes.get(path), Some(Node::Directory)) {
            return Err(FsError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::other("is a directory"),
            });
        }
        nodes.insert(path.to_path_buf(), Node::File(contents.to_vec()));
        Ok(())
    }

    fn remove(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
        let mut nodes = self.nodes.write();
        match nodes.get(path) {
            None => Ok(()),
            Some(Node::File(_)) => {
                nodes.remove(path);
                Ok(())
            }
            Some(Node::Directory) => {
                let children: Vec<PathBuf> = nodes
                    .keys()
                    .filter(|p| p.starts_with(path) && p.as_path() != path)
                    .cloned()
                    .collect();
                if !children.is_empty() && !recursive {
                    return Err(FsError::Io {
                        path: path.to_path_buf(),
                        source: std::io::Error::other("directory not empty"),
                    });
                }
                for child in children {
                    nodes.remove(&child);
                }
                nodes.remove(path);
                Ok(())
            }
        }
    }
}
