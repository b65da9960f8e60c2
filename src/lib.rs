pub mod aggregate;
pub mod app;
pub mod board;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod status;
pub mod storage;
pub mod summary;
pub mod ui;

pub use app::router;
pub use config::Settings;
pub use dates::{DateNormalizer, YearMonth, count_sundays};
pub use state::AppState;
pub use storage::{JsonStore, load_data};
pub use summary::{compute_summary, count_sundays_in_month};
