//service/mod.rs
pub mod browse_service;
pub mod categorize_service;
pub mod models;
pub mod path_guard;

pub use browse_service::BrowseService;
pub use categorize_service::CategorizeService;
pub use path_guard::PathGuard;
