//! REST API for fleet report computation and chart data.
//!
//! Endpoints:
//! - `POST /report` — compute and store a report, returning its identifier
//! - `GET /report/{id}` — retrieve a stored report
//! - `GET /report/{id}/profile` — daily charge-profile series
//! - `GET /report/{id}/costs` — cost-vs-tariff series
//! - `GET /report/{id}/degradation` — multi-year capacity series

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::config::ScenarioConfig;
use crate::store::ReportStore;

/// Application state shared across all request handlers.
///
/// The store is internally synchronized and the configuration is read-only,
/// so a plain `Arc` suffices.
pub struct AppState {
    /// Scenario configuration (tariff, charging, and degradation sections).
    pub config: ScenarioConfig,
    /// Injected report store.
    pub store: Box<dyn ReportStore>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/report", post(handlers::create_report))
        .route("/report/{id}", get(handlers::get_report))
        .route("/report/{id}/profile", get(handlers::get_profile))
        .route("/report/{id}/costs", get(handlers::get_costs))
        .route("/report/{id}/degradation", get(handlers::get_degradation))
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
