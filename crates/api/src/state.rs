use std::sync::Arc;

use joba_storage::FileStorage;

use crate::config::ServerConfig;
use crate::engine::EngineContext;
use crate::oauth::OAuthClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: joba_db::DbPool,
    /// Server configuration, built once at startup.
    pub config: Arc<ServerConfig>,
    /// Upload backend.
    pub storage: Arc<dyn FileStorage>,
    /// Social login token exchange.
    pub oauth: Arc<dyn OAuthClient>,
}

impl AppState {
    /// Borrow the pieces the engine needs for one unit of work.
    pub fn engine(&self) -> EngineContext<'_> {
        EngineContext {
            pool: &self.pool,
            storage: self.storage.as_ref(),
            max_file_size_bytes: self.config.max_file_size_bytes,
        }
    }
}
