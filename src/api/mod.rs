//! Read-only REST API over the last calculation result.
//!
//! Three GET endpoints:
//! - `/results` sizing, annual energy and financial summary
//! - `/dispatch?season=<name>` seasonal dispatch days
//! - `/cashflow?from=N&to=M` cash-flow years with optional range filtering

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::runner::RunCoordinator;

pub use types::{CashFlowQuery, DispatchQuery, ErrorResponse, SummaryResponse};

/// Application state shared across request handlers.
///
/// Handlers only read; the coordinator owns the busy flag and the stored
/// result.
#[derive(Debug, Default)]
pub struct AppState {
    pub runner: RunCoordinator,
}

impl AppState {
    pub fn new(runner: RunCoordinator) -> Self {
        Self { runner }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/results", get(handlers::get_results))
        .route("/dispatch", get(handlers::get_dispatch))
        .route("/cashflow", get(handlers::get_cashflow))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
