use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/activities", get(handlers::list_activities).post(handlers::add_activity))
        .route("/api/activities/:id", delete(handlers::remove_activity))
        .route("/api/meals", get(handlers::get_meals))
        .route("/api/meals/:slot", post(handlers::add_meal))
        .route("/api/meals/:slot/:id", delete(handlers::remove_meal))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/badges", get(handlers::get_badges))
        .route("/api/insights", get(handlers::get_insights))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
