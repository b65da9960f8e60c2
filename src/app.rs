use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/summary/latest", get(handlers::get_latest_summary))
        .route("/api/sundays", get(handlers::get_sundays))
        .route("/api/employees", get(handlers::list_employees))
        .route(
            "/api/attendance",
            get(handlers::attendance_sheet).post(handlers::mark_attendance),
        )
        .route(
            "/api/feeds/:feed",
            get(handlers::feed_sheet).post(handlers::mark_activity),
        )
        .route("/api/feeds/:feed/report", get(handlers::feed_report))
        .with_state(state)
}
