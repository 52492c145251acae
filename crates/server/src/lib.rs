//! Billpress server - invoice records over HTTP
//!
//! Records are entered through an HTML form, saved to PostgreSQL (or memory
//! when no database is configured) and printed by stamping their values onto
//! the first page of a pre-printed PDF form.

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod state;
pub mod store;
pub mod views;

pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Application router with request tracing
pub fn app(state: AppState) -> Router {
    api::router(state).layer(TraceLayer::new_for_http())
}
