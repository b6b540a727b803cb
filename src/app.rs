use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/goal", post(handlers::set_goal_form))
        .route("/export/step_history.csv", get(handlers::export_csv))
        .route("/api/state", get(handlers::get_state))
        .route("/api/state/next", get(handlers::next_state))
        .route("/api/permission", post(handlers::permission))
        .route("/api/motion", post(handlers::motion))
        .route("/api/goal", post(handlers::set_goal))
        .route("/api/dark-mode", post(handlers::dark_mode))
        .route("/api/panel", post(handlers::select_panel))
        .with_state(state)
}
