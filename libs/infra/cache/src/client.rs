// [libs/infra/cache/src/client.rs]
//! Connection management for the cache. Mirrors
//! `ledgercore_relational::RelationalClient`: a single long-lived client
//! handle shared across callers, each call checking out the shared
//! connection manager (which owns its own internal multiplexed pool).

use crate::errors::CacheError;
use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct CacheClient {
    manager: ConnectionManager,
}

impl CacheClient {
    #[instrument]
    pub async fn connect(connection_url: &str) -> Result<Self, CacheError> {
        if connection_url.is_empty() {
            return Err(CacheError::Connection("cache connection url is empty".to_string()));
        }
        info!(url = connection_url, "opening cache connection");
        let client = Client::open(connection_url)
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        Ok(Self { manager })
    }

    /// Returns a cheap clone of the shared connection manager. Safe for
    /// concurrent use by independent tasks; the manager owns its own
    /// reconnect/multiplex logic and internal pool.
    pub fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }
}
