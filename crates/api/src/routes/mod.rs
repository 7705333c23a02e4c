//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod roundups;
pub mod transactions;

#[cfg(test)]
mod test_support;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(transactions::routes())
        .merge(roundups::routes())
}
