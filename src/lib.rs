//! Library crate for pick-a-brain, exposing modules for binaries and integration tests.

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod client;
pub mod config;
pub mod dao;
pub mod dto;
pub mod engine;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

/// Build the top-level router and attach cross-cutting middleware layers.
pub fn build_router(state: state::SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
