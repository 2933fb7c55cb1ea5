use crate::dashboard::Dashboard;
use crate::storage::FileStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard<FileStore>>>,
}

impl AppState {
    pub fn new(dashboard: Dashboard<FileStore>) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }
}
