// Request handlers for the /api endpoints
use actix_web::{web, HttpResponse};
use log::{debug, error, info, warn};

use crate::api::run_blocking;
use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::service::models::{
    ListDirectoriesQuery, ListImagesRequest, ListSubdirectoriesRequest, SaveCategorizedRequest,
};

fn log_failure(operation: &str, err: &ApiError) {
    match err {
        ApiError::Internal(message) => error!("{} failed: {}", operation, message),
        other => warn!("{} rejected: {}", operation, other),
    }
}

fn respond<T: serde::Serialize>(operation: &str, result: ApiResult<T>) -> ApiResult<HttpResponse> {
    match result {
        Ok(body) => Ok(HttpResponse::Ok().json(body)),
        Err(e) => {
            log_failure(operation, &e);
            Err(e)
        }
    }
}

/// Lists the subdirectories of `?root=` (or the default root) plus a `..` entry
/// Handles requests like: GET /api/list-directories?root=/home/me
pub async fn list_directories_handler(
    query: web::Query<ListDirectoriesQuery>,
    app_state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let root = query.into_inner().root;
    debug!("List directories: root={:?}", root);

    let service = app_state.browse_service.clone();
    let folder = root.clone().unwrap_or_default();
    let result = run_blocking("list-directories", folder, move || {
        service.list_directories(root.as_deref())
    })
    .await;
    respond("list-directories", result)
}

/// Lists the subdirectories of the `directory` in the body
/// Handles requests like: POST /api/list-subdirectories {"directory": "/home/me"}
pub async fn list_subdirectories_handler(
    body: web::Json<ListSubdirectoriesRequest>,
    app_state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let directory = body.into_inner().directory;
    debug!("List subdirectories: directory={:?}", directory);

    let service = app_state.browse_service.clone();
    let folder = directory.clone().unwrap_or_default();
    let result = run_blocking("list-subdirectories", folder, move || {
        service.list_subdirectories(directory.as_deref())
    })
    .await;
    respond("list-subdirectories", result)
}

/// Lists image files in `folderPath`
/// Handles requests like: POST /api/list-images {"folderPath": "/home/me/Pictures"}
pub async fn list_images_handler(
    body: web::Json<ListImagesRequest>,
    app_state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let folder_path = body.into_inner().folder_path;
    debug!("List images: folderPath={:?}", folder_path);

    let service = app_state.browse_service.clone();
    let folder = folder_path.clone().unwrap_or_default();
    let result = run_blocking("list-images", folder, move || {
        service.list_images(folder_path.as_deref())
    })
    .await;
    respond("list-images", result)
}

/// Returns one image's bytes with a content type taken from its extension
/// Handles requests like: GET /api/image/%2Fhome%2Fme%2FPictures/cat.jpg
pub async fn get_image_handler(
    path: web::Path<(String, String)>,
    app_state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let (folder_path, filename) = path.into_inner();
    debug!("Get image: folder={}, filename={}", folder_path, filename);

    let service = app_state.browse_service.clone();
    let folder = folder_path.clone();
    let result = run_blocking("get-image", folder, move || {
        service.read_image(&folder_path, &filename)
    })
    .await;

    match result {
        Ok((path, data)) => {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            let mime = actix_files::file_extension_to_mime(&ext);
            Ok(HttpResponse::Ok().content_type(mime).body(data))
        }
        Err(e) => {
            log_failure("get-image", &e);
            Err(e)
        }
    }
}

/// Copies labelled images into `categorized_images/<category>/`
/// Handles requests like: POST /api/save-categorized {"sourceFolder": ..., "categorizedImages": [...]}
pub async fn save_categorized_handler(
    body: web::Json<SaveCategorizedRequest>,
    app_state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let request = body.into_inner();
    let item_count = request.categorized_images.as_ref().map(Vec::len).unwrap_or(0);
    info!("Save categorized: sourceFolder={:?}, items={}", request.source_folder, item_count);

    let service = app_state.categorize_service.clone();
    let folder = request.source_folder.clone().unwrap_or_default();
    let result = run_blocking("save-categorized", folder, move || {
        service.save_categorized(&request)
    })
    .await;
    respond("save-categorized", result)
}
