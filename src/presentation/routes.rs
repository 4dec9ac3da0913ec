// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    create_entry, delete_entry, health_check, list_entries, progress_chart, update_entry,
};
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/entries", get(list_entries).post(create_entry))
        .route("/entries/:id", put(update_entry).delete(delete_entry))
        .route("/progress", get(progress_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
