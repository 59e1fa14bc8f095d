// [libs/infra/cache/src/outbox.rs]
//! Durable hash of pending transaction payloads. Entries are written
//! inside the BalanceEngine script itself; this wrapper exists for the
//! recovery/replay paths (`get_all`, `remove`) that run outside that
//! script.

use crate::errors::CacheError;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use tracing::instrument;

pub struct OutboxQueue {
    hash_key: String,
}

impl OutboxQueue {
    pub fn new(hash_key: impl Into<String>) -> Self {
        Self {
            hash_key: hash_key.into(),
        }
    }

    /// The physical key this queue was constructed with. Exposed mainly so
    /// callers can assert tenant namespacing was applied before the queue
    /// was built, rather than threading the key through twice.
    pub fn hash_key(&self) -> &str {
        &self.hash_key
    }

    #[instrument(skip(self, connection, payload))]
    pub async fn put(
        &self,
        connection: &mut ConnectionManager,
        transaction_key: &str,
        payload: &str,
    ) -> Result<(), CacheError> {
        connection
            .hset::<_, _, _, ()>(&self.hash_key, transaction_key, payload)
            .await
            .map_err(CacheError::from)
    }

    #[instrument(skip(self, connection))]
    pub async fn get_all(
        &self,
        connection: &mut ConnectionManager,
    ) -> Result<HashMap<String, String>, CacheError> {
        connection
            .hgetall(&self.hash_key)
            .await
            .map_err(CacheError::from)
    }

    #[instrument(skip(self, connection))]
    pub async fn get_one(
        &self,
        connection: &mut ConnectionManager,
        transaction_key: &str,
    ) -> Result<Option<String>, CacheError> {
        connection
            .hget(&self.hash_key, transaction_key)
            .await
            .map_err(CacheError::from)
    }

    #[instrument(skip(self, connection))]
    pub async fn remove(
        &self,
        connection: &mut ConnectionManager,
        transaction_key: &str,
    ) -> Result<(), CacheError> {
        connection
            .hdel::<_, _, ()>(&self.hash_key, transaction_key)
            .await
            .map_err(CacheError::from)
    }
}
