//! Configuration for filesystem store backends

use crate::storage::{FileStore, local_store::LocalFileStore, mock_store::MockFileStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::env;
use log::{info, warn};

/// Available filesystem store backends
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Local,
    Mock,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "fs" | "disk" => Ok(StoreBackend::Local),
            "mock" | "memory" => Ok(StoreBackend::Mock),
            _ => Err(format!("Unknown store backend: {}", s))
        }
    }
}

/// Configuration for the filesystem store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl StoreConfig {
    /// Apply the `STORE_BACKEND` environment variable on top of this configuration
    pub fn with_env_override(mut self) -> Self {
        match env::var("STORE_BACKEND") {
            Ok(backend_str) => match backend_str.parse::<StoreBackend>() {
                Ok(backend) => {
                    info!("Using store backend from environment: {:?}", backend);
                    self.backend = backend;
                }
                Err(e) => {
                    warn!("Invalid store backend in environment: {}. Keeping {:?}.", e, self.backend);
                }
            },
            Err(_) => {
                info!("No store backend specified in environment, using {:?}", self.backend);
            }
        }
        self
    }

    /// Create a store instance based on the configuration
    pub fn create_store(&self) -> Arc<dyn FileStore> {
        match self.backend {
            StoreBackend::Local => Arc::new(LocalFileStore::new()),
            StoreBackend::Mock => Arc::new(MockFileStore::new()),
        }
    }
}
