// [tests/mirror/libs/infra/document/metadata_store.test.rs]
//! `DocumentClient::connect` only parses the connection URI and builds a
//! lazily-connecting driver handle — it performs no socket I/O for a plain
//! `mongodb://` URI, so these tests exercise connection-string handling and
//! collection naming (one collection per entity kind, lowercased) without
//! requiring a live MongoDB instance.

use ledgercore_document::{DocumentClient, DocumentError};
use ledgercore_domain::Metadata;
use mongodb::bson::Document;

#[tokio::test]
async fn certify_empty_connection_url_is_rejected() {
    let result = DocumentClient::connect("", "ledgercore").await;
    assert!(matches!(result, Err(DocumentError::Connection(_))));
}

#[tokio::test]
async fn certify_valid_uri_builds_a_client_without_network_io() {
    let client = DocumentClient::connect("mongodb://127.0.0.1:27017", "ledgercore_test").await;
    assert!(client.is_ok());
}

#[tokio::test]
async fn certify_collection_name_is_lowercased_per_entity_kind() {
    let client = DocumentClient::connect("mongodb://127.0.0.1:27017", "ledgercore_test")
        .await
        .unwrap();

    let collection = client.collection::<Metadata>("Transaction");
    assert_eq!(collection.name(), "transaction");

    let already_lower = client.collection::<Document>("operation");
    assert_eq!(already_lower.name(), "operation");
}

#[tokio::test]
async fn certify_distinct_entity_kinds_map_to_distinct_collections() {
    let client = DocumentClient::connect("mongodb://127.0.0.1:27017", "ledgercore_test")
        .await
        .unwrap();

    let transactions = client.collection::<Metadata>("transaction");
    let operations = client.collection::<Metadata>("operation");
    assert_ne!(transactions.name(), operations.name());
}
