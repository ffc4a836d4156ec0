pub mod app;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod refresh;
pub mod state;
pub mod stats;
pub mod storage;
pub mod table;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{DatasetCache, load_dataset};
