// [libs/infra/document/src/client.rs]
//! Connection management for the document store, mirroring
//! `ledgercore_relational::RelationalClient` and `ledgercore_cache::CacheClient`:
//! a single long-lived handle, shared by reference, whose internal pool the
//! driver owns.

use crate::errors::DocumentError;
use mongodb::{Client, Database};
use tracing::{info, instrument};

#[derive(Clone)]
pub struct DocumentClient {
    database: Database,
}

impl DocumentClient {
    #[instrument]
    pub async fn connect(connection_url: &str, database_name: &str) -> Result<Self, DocumentError> {
        if connection_url.is_empty() {
            return Err(DocumentError::Connection(
                "document connection url is empty".to_string(),
            ));
        }
        info!(url = connection_url, database = database_name, "opening document connection");
        let client = Client::with_uri_str(connection_url)
            .await
            .map_err(DocumentError::Query)?;
        Ok(Self {
            database: client.database(database_name),
        })
    }

    /// Returns the collection named `collection_name` verbatim. Callers
    /// (the `MetadataStore`) are responsible for normalizing the entity
    /// kind tag before it reaches this boundary.
    pub fn collection<T: Send + Sync>(
        &self,
        collection_name: &str,
    ) -> mongodb::Collection<T> {
        self.database.collection(collection_name)
    }
}
