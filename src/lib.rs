// Oxidation Search - Materials Project oxidation-state lookup by formula

pub mod config;
pub mod materials; // Outbound Materials Project client
pub mod middleware;
pub mod models;
pub mod routes;
pub mod tui; // Terminal front end
pub mod types;
pub mod utils;
pub mod view; // Search view state + relay client

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
