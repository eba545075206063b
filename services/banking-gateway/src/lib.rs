pub mod banking;
pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod store;

use actix_cors::Cors;
use banking::MockBank;
use risk_engine::RiskScorer;
use std::sync::Arc;
use store::BankingStore;

// Re-exports for convenience
pub use handlers::configure_routes;
pub use store::MemoryStore;

/// Shared, read-only per-process state handed to every handler
pub struct AppState {
    pub store: Arc<dyn BankingStore>,
    pub scorer: RiskScorer,
    pub bank: MockBank,
}

impl AppState {
    pub fn new(store: Arc<dyn BankingStore>, scorer: RiskScorer, bank: MockBank) -> Self {
        Self {
            store,
            scorer,
            bank,
        }
    }
}

/// Any origin may call the functions
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
