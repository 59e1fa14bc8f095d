// [libs/core/datasource/src/config.rs]
//! Connection-string loading for the relational, cache, and document
//! backends, extending the `TursoClient::connect` environment-variable
//! pattern uniformly across all three.

use crate::errors::ConfigError;

#[derive(Debug, Clone)]
pub struct DataSourceConfig {
    pub relational_url: String,
    pub relational_token: Option<String>,
    pub cache_url: String,
    pub document_url: String,
}

impl DataSourceConfig {
    /// Loads connection strings from the environment, having first loaded
    /// a `.env` file if present (no-op if absent).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Ok(Self {
            relational_url: required_var("LEDGERCORE_RELATIONAL_URL")?,
            relational_token: std::env::var("LEDGERCORE_RELATIONAL_TOKEN").ok(),
            cache_url: required_var("LEDGERCORE_CACHE_URL")?,
            document_url: required_var("LEDGERCORE_DOCUMENT_URL")?,
        })
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}
