// [libs/infra/relational/src/client.rs]
//! Connection management for the relational store. Mirrors `TursoClient`:
//! a single long-lived `Database` handle shared across repositories, each
//! repository checking out its own `Connection` per call.

use crate::errors::RelationalError;
use crate::schema::apply_ledger_schema;
use libsql::{Builder, Connection, Database};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct RelationalClient {
    database: Arc<Database>,
    /// Keeps an in-memory database alive across calls; dropped for
    /// disk-backed or remote connections.
    _memory_anchor: Option<Arc<Connection>>,
}

impl RelationalClient {
    #[instrument(skip(access_token))]
    pub async fn connect(
        connection_url: &str,
        access_token: Option<String>,
    ) -> Result<Self, RelationalError> {
        if connection_url.is_empty() {
            return Err(RelationalError::Connection(
                "relational connection url is empty".to_string(),
            ));
        }

        let is_remote =
            connection_url.starts_with("libsql://") || connection_url.starts_with("https://");
        let is_memory = connection_url.contains(":memory:") || connection_url.contains("mode=memory");

        info!(url = connection_url, "opening relational connection");

        let database = if is_remote {
            let token = access_token.ok_or_else(|| {
                RelationalError::Connection("remote connection requires an access token".to_string())
            })?;
            Builder::new_remote(connection_url.to_string(), token)
                .build()
                .await
        } else {
            Builder::new_local(connection_url).build().await
        }
        .map_err(|e| RelationalError::Connection(e.to_string()))?;

        let database = Arc::new(database);
        let mut anchor = None;

        if is_memory {
            let anchor_connection = database
                .connect()
                .map_err(|e| RelationalError::Connection(e.to_string()))?;
            apply_ledger_schema(&anchor_connection)
                .await
                .map_err(|e| RelationalError::Connection(e.to_string()))?;
            anchor = Some(Arc::new(anchor_connection));
        } else {
            let bootstrap = database
                .connect()
                .map_err(|e| RelationalError::Connection(e.to_string()))?;
            apply_ledger_schema(&bootstrap)
                .await
                .map_err(|e| RelationalError::Connection(e.to_string()))?;
        }

        Ok(Self {
            database,
            _memory_anchor: anchor,
        })
    }

    pub fn get_connection(&self) -> Result<Connection, RelationalError> {
        self.database
            .connect()
            .map_err(|e| RelationalError::Connection(e.to_string()))
    }
}
