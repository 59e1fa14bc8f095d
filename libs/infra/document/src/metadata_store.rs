// [libs/infra/document/src/metadata_store.rs]
//! CRUD and batch lookup of per-entity metadata documents. One MongoDB
//! collection per entity kind, named by the lowercased kind tag.
//! `find_by_entity` returning `Ok(None)` for an absent document is a
//! normal state, not an error — callers must not treat absence as a
//! failure.

use crate::client::DocumentClient;
use crate::errors::DocumentError;
use chrono::Utc;
use futures::stream::TryStreamExt;
use ledgercore_domain::Metadata;
use mongodb::bson::{doc, Document};
use tracing::instrument;

pub struct MetadataStore {
    client: DocumentClient,
}

impl MetadataStore {
    pub fn new(client: DocumentClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, meta), name = "document.create_metadata")]
    pub async fn create(&self, entity_kind: &str, meta: &Metadata) -> Result<(), DocumentError> {
        self.client
            .collection::<Metadata>(&entity_kind.to_lowercase())
            .insert_one(meta)
            .await
            .map_err(DocumentError::Query)?;
        Ok(())
    }

    #[instrument(skip(self, filter), name = "document.find_list_metadata")]
    pub async fn find_list(
        &self,
        entity_kind: &str,
        filter: Document,
    ) -> Result<Vec<Metadata>, DocumentError> {
        let cursor = self
            .client
            .collection::<Metadata>(&entity_kind.to_lowercase())
            .find(filter)
            .await
            .map_err(DocumentError::Query)?;
        cursor.try_collect().await.map_err(DocumentError::Query)
    }

    #[instrument(skip(self), name = "document.find_by_entity_metadata")]
    pub async fn find_by_entity(
        &self,
        entity_kind: &str,
        entity_id: &str,
    ) -> Result<Option<Metadata>, DocumentError> {
        self.client
            .collection::<Metadata>(&entity_kind.to_lowercase())
            .find_one(doc! { "entity_id": entity_id })
            .await
            .map_err(DocumentError::Query)
    }

    #[instrument(skip(self, entity_ids), name = "document.find_by_entity_ids_metadata")]
    pub async fn find_by_entity_ids(
        &self,
        entity_kind: &str,
        entity_ids: &[String],
    ) -> Result<Vec<Metadata>, DocumentError> {
        if entity_ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .client
            .collection::<Metadata>(&entity_kind.to_lowercase())
            .find(doc! { "entity_id": { "$in": entity_ids } })
            .await
            .map_err(DocumentError::Query)?;
        cursor.try_collect().await.map_err(DocumentError::Query)
    }

    /// Upserts: an absent document is created rather than rejected.
    #[instrument(skip(self, fields), name = "document.update_metadata")]
    pub async fn update(
        &self,
        entity_kind: &str,
        entity_id: &str,
        entity_name: &str,
        fields: Document,
    ) -> Result<(), DocumentError> {
        let now = Utc::now().to_rfc3339();
        self.client
            .collection::<Document>(&entity_kind.to_lowercase())
            .update_one(
                doc! { "entity_id": entity_id },
                doc! {
                    "$set": { "metadata": fields, "updated_at": now },
                    "$setOnInsert": {
                        "entity_id": entity_id,
                        "entity_name": entity_name,
                        "created_at": Utc::now().to_rfc3339(),
                    },
                },
            )
            .upsert(true)
            .await
            .map_err(DocumentError::Query)?;
        Ok(())
    }

    /// Idempotent: deleting an absent document is not an error.
    #[instrument(skip(self), name = "document.delete_metadata")]
    pub async fn delete(&self, entity_kind: &str, entity_id: &str) -> Result<(), DocumentError> {
        self.client
            .collection::<Metadata>(&entity_kind.to_lowercase())
            .delete_one(doc! { "entity_id": entity_id })
            .await
            .map_err(DocumentError::Query)?;
        Ok(())
    }
}
