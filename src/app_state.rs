//! Application State Management
//!
//! This module provides the application state that contains all services
//! and their dependencies, following the dependency injection pattern.

use std::path::PathBuf;
use std::sync::Arc;
use log::info;

use crate::config::AppConfig;
use crate::service::{BrowseService, CategorizeService, PathGuard};
use crate::storage::FileStore;
use crate::storage::mock_store::MockFileStore;

/// Application state containing all services and their dependencies
#[derive(Clone)]
pub struct AppState {
    pub browse_service: Arc<BrowseService>,
    pub categorize_service: Arc<CategorizeService>,
    pub config: AppConfig,
}

/// Directory listed when the caller names none: configured root, then the
/// first allowed root when paths are restricted, then home, then `/`
pub fn resolve_default_root(config: &AppConfig) -> PathBuf {
    config
        .browse
        .default_root
        .as_ref()
        .or_else(|| config.browse.allowed_roots.first())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("/"))
}

impl AppState {
    /// Create application state from configuration
    pub fn from_config(config: AppConfig) -> Self {
        info!("Initializing application state with {:?} store backend", config.store.backend);
        let store = config.store.create_store();
        Self::with_store(config, store)
    }

    /// Create application state around an existing store
    pub fn with_store(config: AppConfig, store: Arc<dyn FileStore>) -> Self {
        let guard = PathGuard::new(&config.browse.allowed_roots);
        if guard.is_restricted() {
            info!("Restricting caller paths to {:?}", config.browse.allowed_roots);
        }
        let default_root = resolve_default_root(&config);
        info!("Default browse root: {}", default_root.display());

        let browse_service = Arc::new(BrowseService::new(store.clone(), guard.clone(), default_root));
        let categorize_service = Arc::new(CategorizeService::new(store, guard));

        info!("Application state initialized successfully");
        Self {
            browse_service,
            categorize_service,
            config,
        }
    }

    /// Create application state for testing over the given mock store
    pub fn new_for_testing(store: Arc<MockFileStore>) -> Self {
        Self::with_store(AppConfig::default(), store)
    }
}
