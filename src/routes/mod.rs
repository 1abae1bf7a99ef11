//! API Routes
//!
//! - `/api/oxidation-state` - Relay to the Materials Project
//! - `/api/health` - Health check
//! - `/` - Browser search page

pub mod health;
pub mod oxidation_state;
pub mod ui;

use axum::Router;
use crate::middleware;
use crate::models::AppState;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .merge(oxidation_state::router(state.clone()))
        .merge(health::router(state))
        .merge(ui::router());

    middleware::apply_trace(middleware::apply_cors(router, &origins))
}
