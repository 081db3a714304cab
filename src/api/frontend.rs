// Serves the bundled single-page frontend
use std::path::{Component, Path, PathBuf};

use actix_files::NamedFile;
use actix_web::web;
use log::{debug, warn};

use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};

const INDEX_FILE: &str = "index.html";

/// Asset path under `static_dir` for `tail`, if it names an existing file.
/// Only plain relative components are accepted.
pub fn resolve_asset(static_dir: &Path, tail: &str) -> Option<PathBuf> {
    if tail.is_empty() {
        return None;
    }
    let relative = Path::new(tail);
    if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }
    let candidate = static_dir.join(relative);
    candidate.is_file().then_some(candidate)
}

/// Serves a frontend asset, falling back to `index.html` for client-side routes
/// Handles requests like: GET /assets/app.js, GET /sort/view
pub async fn frontend_handler(
    tail: web::Path<String>,
    app_state: web::Data<AppState>,
) -> ApiResult<NamedFile> {
    let tail = tail.into_inner();
    let static_dir = PathBuf::from(&app_state.config.frontend.static_dir);

    let path = resolve_asset(&static_dir, &tail).unwrap_or_else(|| static_dir.join(INDEX_FILE));
    debug!("Frontend request /{} -> {}", tail, path.display());

    NamedFile::open_async(&path).await.map_err(|e| {
        warn!("Frontend asset unavailable at {}: {}", path.display(), e);
        ApiError::NotFound("Frontend asset not found".to_string())
    })
}
