//! REST API for scenario results and chart series.
//!
//! Provides three GET endpoints:
//! - `/scenarios` — the full evaluation: three scenarios plus warnings
//! - `/series/year` — monthly chart series for one scenario
//! - `/series/day` — hourly chart series for one scenario and season

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::engine::types::Evaluation;
use crate::params::HouseholdParameters;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the evaluation completes and wrapped in `Arc`;
/// no locks needed since all data is read-only.
pub struct AppState {
    /// Household parameters the evaluation was computed from.
    pub params: HouseholdParameters,
    /// Complete engine output.
    pub evaluation: Evaluation,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scenarios", get(handlers::get_scenarios))
        .route("/series/year", get(handlers::get_year_series))
        .route("/series/day", get(handlers::get_day_series))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
