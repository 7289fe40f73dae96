use std::sync::Arc;

use crate::models::SeasonSelection;
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    /// Season used when a request does not name one
    pub selection: Option<SeasonSelection>,
}

impl AppState {
    pub fn new(storage: StorageConfig, selection: Option<SeasonSelection>) -> Self {
        Self {
            storage: Arc::new(storage),
            selection,
        }
    }
}
