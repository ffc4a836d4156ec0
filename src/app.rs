use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/refresh/toggle", post(handlers::toggle_refresh))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/export", get(handlers::export))
        .route(
            "/api/refresh",
            get(handlers::get_refresh).post(handlers::set_refresh),
        )
        .route("/api/refresh/wait", get(handlers::wait_refresh))
        .with_state(state)
}
