pub mod config;
pub mod errors;
pub mod registry;
pub mod router;

pub use config::DataSourceConfig;
pub use errors::{ConfigError, RouterError};
pub use registry::ConnectionRegistry;
pub use router::{DataSourceRouter, RequestContext, StaticRouter};
