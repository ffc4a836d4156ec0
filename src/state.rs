use crate::config::Config;
use crate::refresh::RefreshController;
use crate::storage::DatasetCache;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<DatasetCache>,
    pub refresh: Arc<RefreshController>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            dataset: Arc::new(DatasetCache::new(config.data_path.clone())),
            refresh: Arc::new(RefreshController::new(config.refresh_interval)),
        }
    }
}
