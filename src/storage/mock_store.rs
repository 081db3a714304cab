//! Mock implementation of FileStore for testing

use crate::storage::{EntryKind, FileStore, FsEntry};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use log::info;

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
}

/// In-memory directory tree for testing.
///
/// The root `/` always exists. Paths registered with [`MockFileStore::deny`]
/// answer every operation with `PermissionDenied`, which lets tests exercise
/// access failures regardless of the user running them.
pub struct MockFileStore {
    nodes: Arc<Mutex<HashMap<PathBuf, Node>>>,
    denied: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileStore {
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            nodes: Arc::new(Mutex::new(nodes)),
            denied: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Add a directory (and its parents)
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut nodes = self.nodes.lock().unwrap();
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
    }

    /// Add a file with the given contents, creating parent directories
    pub fn add_file(&self, path: impl AsRef<Path>, data: &[u8]) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        let mut nodes = self.nodes.lock().unwrap();
        nodes.insert(path.to_path_buf(), Node::File(data.to_vec()));
    }

    /// Refuse all access to `path`
    pub fn deny(&self, path: impl AsRef<Path>) {
        let mut denied = self.denied.lock().unwrap();
        denied.insert(path.as_ref().to_path_buf());
    }

    /// Contents of a stored file, if present
    pub fn file_contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let nodes = self.nodes.lock().unwrap();
        match nodes.get(path.as_ref()) {
            Some(Node::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// Number of entries in the tree, the root included
    pub fn entry_count(&self) -> usize {
        let nodes = self.nodes.lock().unwrap();
        nodes.len()
    }

    fn check_access(&self, path: &Path) -> io::Result<()> {
        let denied = self.denied.lock().unwrap();
        if denied.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {}", path.display()),
            ));
        }
        Ok(())
    }
}

impl Default for MockFileStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("No such file or directory: {}", path.display()),
    )
}

impl FileStore for MockFileStore {
    fn metadata(&self, path: &Path) -> io::Result<EntryKind> {
        let nodes = self.nodes.lock().unwrap();
        match nodes.get(path) {
            Some(Node::Dir) => Ok(EntryKind::Directory),
            Some(Node::File(_)) => Ok(EntryKind::File),
            None => Err(not_found(path)),
        }
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        self.check_access(path)?;
        let nodes = self.nodes.lock().unwrap();
        match nodes.get(path) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Not a directory: {}", path.display()),
                ))
            }
            None => return Err(not_found(path)),
        }

        let entries = nodes
            .iter()
            .filter(|(child, _)| child.parent() == Some(path))
            .map(|(child, node)| FsEntry {
                name: child
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                path: child.clone(),
                kind: match node {
                    Node::Dir => EntryKind::Directory,
                    Node::File(_) => EntryKind::File,
                },
            })
            .collect();
        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_access(path)?;
        let mut nodes = self.nodes.lock().unwrap();
        let mut missing = Vec::new();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            match nodes.get(ancestor) {
                Some(Node::Dir) => break,
                Some(Node::File(_)) => {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("File exists: {}", ancestor.display()),
                    ))
                }
                None => missing.push(ancestor.to_path_buf()),
            }
        }
        for dir in missing {
            nodes.insert(dir, Node::Dir);
        }
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        self.check_access(from)?;
        if let Some(parent) = to.parent() {
            self.check_access(parent)?;
        }
        let mut nodes = self.nodes.lock().unwrap();
        let data = match nodes.get(from) {
            Some(Node::File(data)) => data.clone(),
            Some(Node::Dir) => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Is a directory: {}", from.display()),
                ))
            }
            None => return Err(not_found(from)),
        };
        match to.parent().and_then(|p| nodes.get(p)) {
            Some(Node::Dir) => {}
            _ => return Err(not_found(to)),
        }
        let size = data.len() as u64;
        nodes.insert(to.to_path_buf(), Node::File(data));
        info!("Mock copied {} -> {} ({} bytes)", from.display(), to.display(), size);
        Ok(size)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.check_access(path)?;
        self.file_contents(path).ok_or_else(|| not_found(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_store_tree_operations() {
        let store = MockFileStore::new();
        store.add_file("/photos/cat.jpg", b"meow");
        store.add_dir("/photos/albums");

        assert!(store.is_dir(Path::new("/photos")));
        assert!(store.is_file(Path::new("/photos/cat.jpg")));
        assert_eq!(store.list_dir(Path::new("/photos")).unwrap().len(), 2);
        // root, /photos, cat.jpg, albums
        assert_eq!(store.entry_count(), 4);
    }

    #[test]
    fn test_mock_store_copy_requires_destination_dir() {
        let store = MockFileStore::new();
        store.add_file("/photos/cat.jpg", b"meow");

        let missing_parent = Path::new("/sorted/animal/cat_animal.jpg");
        let err = store.copy_file(Path::new("/photos/cat.jpg"), missing_parent).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        store.create_dir_all(Path::new("/sorted/animal")).unwrap();
        assert_eq!(store.copy_file(Path::new("/photos/cat.jpg"), missing_parent).unwrap(), 4);
        assert_eq!(store.file_contents(missing_parent).unwrap(), b"meow");
    }

    #[test]
    fn test_mock_store_denied_paths() {
        let store = MockFileStore::new();
        store.add_dir("/secret");
        store.deny("/secret");

        assert!(store.is_dir(Path::new("/secret")));
        let err = store.list_dir(Path::new("/secret")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_mock_store_create_dir_over_file_fails() {
        let store = MockFileStore::new();
        store.add_file("/data/blocker", b"x");
        assert!(store.create_dir_all(Path::new("/data/blocker/sub")).is_err());
    }
}
