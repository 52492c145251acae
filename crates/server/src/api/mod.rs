//! HTTP routes

mod handlers;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub use handlers::content_disposition;

/// Response header set on `/generate` when the record could not be saved
pub const PERSIST_STATUS_HEADER: &str = "x-persist-status";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/generate", post(handlers::generate))
        .route("/records", get(handlers::records))
        .route("/print/:id", get(handlers::print))
        .route("/edit/:id", get(handlers::edit))
        .route("/update/:id", post(handlers::update))
        .route("/delete/:id", post(handlers::delete))
        .route("/health", get(handlers::health))
        .with_state(state)
}
