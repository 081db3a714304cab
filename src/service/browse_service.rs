//! Directory browsing, image listing and image retrieval

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use log::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::service::models::{
    DirectoryEntry, ImageListResult, ListDirectoriesResponse, ListSubdirectoriesResponse,
};
use crate::service::path_guard::{is_single_component, PathGuard};
use crate::storage::{FileStore, FsEntry};

/// Display name of the synthetic parent entry
pub const PARENT_ENTRY_NAME: &str = "..";

lazy_static! {
    /// Extensions (lower-case, with the dot) treated as images
    pub static ref IMAGE_EXTENSIONS: HashSet<&'static str> = [
        ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg", ".tiff",
    ]
    .into_iter()
    .collect();
}

/// Whether a filename carries one of the image extensions, ignoring case
pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .map(|ext| IMAGE_EXTENSIONS.contains(ext.as_str()))
        .unwrap_or(false)
}

fn sort_by_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| name(item).to_lowercase());
}

fn directory_entry(entry: &FsEntry) -> DirectoryEntry {
    DirectoryEntry {
        path: entry.path.to_string_lossy().to_string(),
        name: entry.name.clone(),
    }
}

/// Service answering the read-only browsing endpoints
pub struct BrowseService {
    store: Arc<dyn FileStore>,
    guard: PathGuard,
    default_root: PathBuf,
}

impl BrowseService {
    pub fn new(store: Arc<dyn FileStore>, guard: PathGuard, default_root: PathBuf) -> Self {
        Self { store, guard, default_root }
    }

    pub fn default_root(&self) -> &Path {
        &self.default_root
    }

    /// Guard and existence checks shared by every listing
    fn validated_dir(&self, path: &Path, invalid_message: &str) -> ApiResult<()> {
        self.guard.check(path)?;
        if !self.store.is_dir(path) {
            warn!("Not a directory: {}", path.display());
            return Err(ApiError::InvalidPath(invalid_message.to_string()));
        }
        Ok(())
    }

    fn child_directories(&self, path: &Path) -> ApiResult<Vec<DirectoryEntry>> {
        let entries = self.store.list_dir(path).map_err(ApiError::from_listing)?;
        let mut directories: Vec<DirectoryEntry> = entries
            .iter()
            .filter(|entry| entry.is_dir())
            .map(directory_entry)
            .collect();
        sort_by_name(&mut directories, |d| d.name.as_str());
        Ok(directories)
    }

    /// List the subdirectories of `root` (or the default root), preceded by a
    /// `..` entry unless `root` is the filesystem root
    pub fn list_directories(&self, root: Option<&str>) -> ApiResult<ListDirectoriesResponse> {
        let current_path = match root.filter(|r| !r.is_empty()) {
            Some(root) => root.to_string(),
            None => self.default_root.to_string_lossy().to_string(),
        };
        let root_path = Path::new(&current_path);
        self.validated_dir(root_path, "Invalid root directory path")?;

        let mut directories = self.child_directories(root_path)?;
        if let Some(parent) = root_path.parent() {
            // Hide the way up when it would lead outside the allowed roots
            if self.guard.allows(parent) {
                directories.insert(
                    0,
                    DirectoryEntry {
                        path: parent.to_string_lossy().to_string(),
                        name: PARENT_ENTRY_NAME.to_string(),
                    },
                );
            }
        }

        debug!("Listed {} directories under {}", directories.len(), current_path);
        Ok(ListDirectoriesResponse {
            directories,
            current_path,
        })
    }

    /// List the subdirectories of `directory`
    pub fn list_subdirectories(&self, directory: Option<&str>) -> ApiResult<ListSubdirectoriesResponse> {
        let directory = directory
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ApiError::InvalidPath("Invalid directory path".to_string()))?;
        let path = Path::new(directory);
        self.validated_dir(path, "Invalid directory path")?;

        let subdirectories = self.child_directories(path)?;
        debug!("Listed {} subdirectories under {}", subdirectories.len(), directory);
        Ok(ListSubdirectoriesResponse { subdirectories })
    }

    /// List the image files directly inside `folder_path`
    pub fn list_images(&self, folder_path: Option<&str>) -> ApiResult<ImageListResult> {
        let folder_path = folder_path
            .filter(|f| !f.is_empty())
            .ok_or_else(|| ApiError::InvalidPath("Invalid folder path".to_string()))?;
        let path = Path::new(folder_path);
        self.validated_dir(path, "Invalid folder path")?;

        let entries = self.store.list_dir(path).map_err(ApiError::from_listing)?;
        let mut images: Vec<String> = entries
            .into_iter()
            .filter(|entry| entry.is_file() && is_image_name(&entry.name))
            .map(|entry| entry.name)
            .collect();
        sort_by_name(&mut images, |name| name.as_str());

        info!("Found {} images in {}", images.len(), folder_path);
        Ok(ImageListResult {
            total_count: images.len(),
            images,
            folder_path: folder_path.to_string(),
        })
    }

    /// Resolve the on-disk location of an image request.
    ///
    /// A relative folder is taken as rooted at `/`, since route captures drop
    /// the leading slash of unencoded absolute paths.
    pub fn image_path(&self, folder_path: &str, filename: &str) -> ApiResult<PathBuf> {
        if !is_single_component(filename) {
            return Err(ApiError::InvalidInput(format!("Invalid filename: {}", filename)));
        }
        let folder = Path::new(folder_path);
        let folder = if folder.is_absolute() {
            folder.to_path_buf()
        } else {
            Path::new("/").join(folder)
        };
        self.guard.check(&folder)?;
        Ok(folder.join(filename))
    }

    /// Read one image's bytes
    pub fn read_image(&self, folder_path: &str, filename: &str) -> ApiResult<(PathBuf, Vec<u8>)> {
        let path = self.image_path(folder_path, filename)?;
        if !self.store.is_file(&path) {
            warn!("Requested image not found: {}", path.display());
            return Err(ApiError::NotFound(format!("File not found: {}", filename)));
        }
        let data = self.store.read_file(&path)?;
        debug!("Serving {} ({} bytes)", path.display(), data.len());
        Ok((path, data))
    }
}
