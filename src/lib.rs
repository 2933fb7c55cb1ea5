pub mod api;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod defaults;
pub mod errors;
pub mod fields;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod paginate;
pub mod persistence;
pub mod session;
pub mod state;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use dashboard::Dashboard;
pub use errors::{DashboardError, DashboardResult};
pub use state::AppState;
pub use storage::{resolve_data_path, FileStore, KeyValueStore, MemoryStore};
pub use store::EntityStore;
