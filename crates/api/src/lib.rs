//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for round-up calculations and records
//! - Request extractors with JSON error responses
//! - Error to HTTP response mapping

pub mod error;
pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use untether_core::roundup::{RoundupRepository, RoundupService};
use untether_db::InMemoryRoundupRepository;
use untether_shared::config::RoundupConfig;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Round-up calculation and record service.
    pub roundups: RoundupService,
    /// History and summary defaults.
    pub roundup_config: Arc<RoundupConfig>,
}

impl AppState {
    /// Creates state over the given repository.
    #[must_use]
    pub fn new(repo: Arc<dyn RoundupRepository>, roundup_config: RoundupConfig) -> Self {
        Self {
            roundups: RoundupService::new(repo),
            roundup_config: Arc::new(roundup_config),
        }
    }

    /// Creates state backed by an empty in-memory repository.
    #[must_use]
    pub fn in_memory(roundup_config: RoundupConfig) -> Self {
        Self::new(Arc::new(InMemoryRoundupRepository::new()), roundup_config)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
