//! Filesystem Access Abstraction
//!
//! Every disk operation the services perform goes through the `FileStore`
//! trait, so the service layer can run against the real filesystem or an
//! in-memory tree without knowing which one it has.

pub mod local_store;
pub mod mock_store;
pub mod config;


use std::io;
use std::path::{Path, PathBuf};

/// Kind of a filesystem entry as seen by the services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    /// Bare entry name
    pub name: String,
    /// Full path of the entry
    pub path: PathBuf,
    /// What the entry points at (symlinks are followed)
    pub kind: EntryKind,
}

impl FsEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Trait defining the filesystem interface used by the services
pub trait FileStore: Send + Sync {
    /// Kind of the entry at `path`, following symlinks
    fn metadata(&self, path: &Path) -> io::Result<EntryKind>;

    /// Immediate children of a directory, in no particular order
    fn list_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>>;

    /// Create a directory and any missing parents; existing directories are fine
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy a file's bytes and metadata, overwriting `to`. Returns bytes copied.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Read a whole file into memory
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Whether `path` exists and is a directory
    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.metadata(path), Ok(EntryKind::Directory))
    }

    /// Whether `path` exists and is a regular file
    fn is_file(&self, path: &Path) -> bool {
        matches!(self.metadata(path), Ok(EntryKind::File))
    }
}
