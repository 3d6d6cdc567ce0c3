use std::sync::Arc;

use critiq_core::review::ReviewLookup;
use critiq_db::repositories::PgReviewLookup;
use critiq_db::DbPool;

use crate::config::ServerConfig;

/// Shared handler state. Cloned per request, so everything heavy sits
/// behind an `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    /// The auth extractor reads `config.jwt`.
    pub config: Arc<ServerConfig>,
    /// Consulted by the review gate before any review write.
    pub review_lookup: Arc<dyn ReviewLookup>,
}

impl AppState {
    /// State backed by Postgres for both the handlers and the review gate.
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        Self {
            review_lookup: Arc::new(PgReviewLookup::new(pool.clone())),
            pool,
            config: Arc::new(config),
        }
    }
}
