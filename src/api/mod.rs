//! HTTP surface: route table and handler plumbing

pub mod frontend;
pub mod handlers;

use actix_web::web;

use crate::error::{json_error_handler, ApiResult};

/// Register every route. The frontend catch-all must stay last.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/api/list-directories", web::get().to(handlers::list_directories_handler))
        .route("/api/list-subdirectories", web::post().to(handlers::list_subdirectories_handler))
        .route("/api/list-images", web::post().to(handlers::list_images_handler))
        .route("/api/image/{folder_path:.*}/{filename}", web::get().to(handlers::get_image_handler))
        .route("/api/save-categorized", web::post().to(handlers::save_categorized_handler))
        .route("/{tail:.*}", web::get().to(frontend::frontend_handler));
}

/// Run blocking filesystem work on the blocking pool, tagging its log lines
/// with the operation and folder through the MDC.
pub(crate) async fn run_blocking<T, F>(operation: &'static str, folder: String, f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || {
        log_mdc::insert("operation", operation);
        log_mdc::insert("folder", folder);
        let result = f();
        log_mdc::clear();
        result
    })
    .await?
}
