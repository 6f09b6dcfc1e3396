//! Route configuration.

use crate::api::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Strategy builder
        .route("/api/v1/builder", post(handlers::build_payoff))
        // Open interest
        .route("/api/v1/open-interest", get(handlers::get_open_interest))
        // Portfolio
        .route(
            "/api/v1/portfolio/stock-data",
            post(handlers::get_stock_data),
        )
        .route(
            "/api/v1/portfolio/analyze",
            post(handlers::analyze_portfolio),
        )
        .route(
            "/api/v1/portfolio/benchmark/{symbol}",
            get(handlers::get_benchmark),
        )
        .with_state(state)
}
