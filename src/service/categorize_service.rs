//! Copies labelled images into per-category folders next to the source folder

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::service::models::{
    CategorizationResult, CategorizedImageRequest, SaveCategorizedRequest, SaveCategorizedResponse,
};
use crate::service::path_guard::{is_single_component, PathGuard};
use crate::storage::FileStore;

/// Name of the folder created beside the source folder
pub const DESTINATION_FOLDER_NAME: &str = "categorized_images";

const INVALID_DATA_MESSAGE: &str = "Invalid data provided";

/// Split a filename into stem and extension at the last dot.
/// Leading dots belong to the stem, so `.hidden` has no extension.
pub fn split_extension(filename: &str) -> (&str, &str) {
    let leading_dots = filename.len() - filename.trim_start_matches('.').len();
    match filename[leading_dots..].rfind('.') {
        Some(index) => filename.split_at(leading_dots + index),
        None => (filename, ""),
    }
}

/// `<stem>_<category><ext>`
pub fn categorized_filename(filename: &str, category: &str) -> String {
    let (stem, ext) = split_extension(filename);
    format!("{}_{}{}", stem, category, ext)
}

/// `<parent-of-source>/categorized_images`
pub fn destination_folder(source: &Path) -> PathBuf {
    source.parent().unwrap_or(source).join(DESTINATION_FOLDER_NAME)
}

fn creation_error(path: &Path, err: io::Error) -> ApiError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => ApiError::PermissionDenied(format!(
            "Permission denied creating {}",
            path.display()
        )),
        _ => ApiError::Internal(err.to_string()),
    }
}

/// Service behind the save-categorized endpoint
pub struct CategorizeService {
    store: Arc<dyn FileStore>,
    guard: PathGuard,
}

impl CategorizeService {
    pub fn new(store: Arc<dyn FileStore>, guard: PathGuard) -> Self {
        Self { store, guard }
    }

    /// Create one folder per distinct category. Invalid labels and failed
    /// creations are kept as per-category error text.
    fn prepare_category_folders<'a>(
        &self,
        dest_parent: &Path,
        items: &'a [CategorizedImageRequest],
    ) -> BTreeMap<&'a str, Result<PathBuf, String>> {
        let categories: BTreeSet<&str> = items
            .iter()
            .filter_map(|item| item.category.as_deref())
            .collect();

        categories
            .into_iter()
            .map(|category| {
                if !is_single_component(category) {
                    return (category, Err(format!("Invalid category: {:?}", category)));
                }
                let folder = dest_parent.join(category);
                let created = self
                    .store
                    .create_dir_all(&folder)
                    .map(|_| folder)
                    .map_err(|e| {
                        warn!("Could not create category folder for {}: {}", category, e);
                        e.to_string()
                    });
                (category, created)
            })
            .collect()
    }

    fn copy_one(
        &self,
        source: &Path,
        filename: &str,
        category: &str,
        folder: &Result<PathBuf, String>,
    ) -> CategorizationResult {
        if !is_single_component(filename) {
            return CategorizationResult::failed(filename, format!("Invalid filename: {:?}", filename));
        }
        let folder = match folder {
            Ok(folder) => folder,
            Err(message) => return CategorizationResult::failed(filename, message.clone()),
        };

        let renamed = categorized_filename(filename, category);
        let dest_path = folder.join(&renamed);
        match self.store.copy_file(&source.join(filename), &dest_path) {
            Ok(bytes) => {
                debug!("Copied {} to {} ({} bytes)", filename, dest_path.display(), bytes);
                CategorizationResult::copied(filename, renamed, category)
            }
            Err(e) => {
                warn!("Failed to copy {} into {}: {}", filename, category, e);
                CategorizationResult::failed(filename, e.to_string())
            }
        }
    }

    /// Copy every labelled image into `categorized_images/<category>/`.
    ///
    /// Items missing a filename or category are skipped. A failing item is
    /// reported in its result and does not stop the rest of the batch; files
    /// already copied stay in place.
    pub fn save_categorized(&self, request: &SaveCategorizedRequest) -> ApiResult<SaveCategorizedResponse> {
        let source_folder = request.source_folder.as_deref().filter(|s| !s.is_empty());
        let items = request.categorized_images.as_deref().filter(|i| !i.is_empty());
        let (source_folder, items) = match (source_folder, items) {
            (Some(source_folder), Some(items)) => (source_folder, items),
            _ => return Err(ApiError::InvalidInput(INVALID_DATA_MESSAGE.to_string())),
        };

        let source = Path::new(source_folder);
        self.guard.check(source)?;
        if !self.store.is_dir(source) {
            warn!("Source folder is not a directory: {}", source_folder);
            return Err(ApiError::InvalidInput(INVALID_DATA_MESSAGE.to_string()));
        }

        let dest_parent = destination_folder(source);
        self.guard.check(&dest_parent)?;
        self.store
            .create_dir_all(&dest_parent)
            .map_err(|e| creation_error(&dest_parent, e))?;

        let folders = self.prepare_category_folders(&dest_parent, items);

        let results = items.iter().fold(Vec::with_capacity(items.len()), |mut results, item| {
            if let (Some(filename), Some(category)) = (item.filename.as_deref(), item.category.as_deref()) {
                if let Some(folder) = folders.get(category) {
                    results.push(self.copy_one(source, filename, category, folder));
                }
            }
            results
        });

        let categorized_count = results.iter().filter(|r| r.success).count();
        info!(
            "Categorized {}/{} images from {} into {}",
            categorized_count,
            results.len(),
            source_folder,
            dest_parent.display()
        );

        Ok(SaveCategorizedResponse {
            results,
            categorized_count,
            destination_folder: dest_parent.to_string_lossy().to_string(),
        })
    }
}
