//! Local filesystem store implementation

use crate::storage::{EntryKind, FileStore, FsEntry};
use filetime::FileTime;
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::Path;

/// Store backed by the real filesystem through `std::fs`
#[derive(Debug, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

fn kind_of(meta: &fs::Metadata) -> EntryKind {
    if meta.is_dir() {
        EntryKind::Directory
    } else if meta.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

impl FileStore for LocalFileStore {
    fn metadata(&self, path: &Path) -> io::Result<EntryKind> {
        fs::metadata(path).map(|meta| kind_of(&meta))
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let entry_path = entry.path();
            // Broken symlinks and entries that vanish mid-listing are skipped
            let kind = match fs::metadata(&entry_path) {
                Ok(meta) => kind_of(&meta),
                Err(e) => {
                    debug!("Skipping unreadable entry {}: {}", entry_path.display(), e);
                    continue;
                }
            };
            entries.push(FsEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry_path,
                kind,
            });
        }
        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        // fs::copy carries permissions; timestamps are carried separately
        let copied = fs::copy(from, to)?;
        let meta = fs::metadata(from)?;
        let atime = FileTime::from_last_access_time(&meta);
        let mtime = FileTime::from_last_modification_time(&meta);
        if let Err(e) = filetime::set_file_times(to, atime, mtime) {
            warn!("Copied {} but could not preserve timestamps: {}", to.display(), e);
        }
        Ok(copied)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}
