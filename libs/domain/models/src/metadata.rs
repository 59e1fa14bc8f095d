// [libs/domain/models/src/metadata.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::DomainError;

/// Bound on key/value string length at ingestion.
pub const METADATA_FIELD_MAX_LEN: usize = 100;

/// Per-entity document stored in the document store. `entity_name` carries
/// the entity kind tag, matching the document-store field name used on the
/// wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub entity_id: String,
    pub entity_name: String,
    pub metadata: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    /// Validates the ingestion bound: keys and string values must be
    /// <= 100 characters.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (key, value) in &self.metadata {
            if key.chars().count() > METADATA_FIELD_MAX_LEN {
                return Err(DomainError::Deserialize(format!(
                    "metadata key {key:?} exceeds {METADATA_FIELD_MAX_LEN} characters"
                )));
            }
            if let Value::String(s) = value {
                if s.chars().count() > METADATA_FIELD_MAX_LEN {
                    return Err(DomainError::Deserialize(format!(
                        "metadata value for key {key:?} exceeds {METADATA_FIELD_MAX_LEN} characters"
                    )));
                }
            }
        }
        Ok(())
    }
}
