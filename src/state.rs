use crate::board::SummaryBoard;
use crate::config::Settings;
use crate::models::AppData;
use crate::storage::JsonStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: JsonStore,
    pub board: Arc<SummaryBoard>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings, data: AppData) -> Self {
        Self {
            store: JsonStore::new(settings.data_path.clone(), data),
            board: Arc::new(SummaryBoard::new()),
            settings: Arc::new(settings),
        }
    }
}
