// [libs/core/datasource/src/router.rs]
//! Routing between a tenant-attached handle and a statically configured
//! one. Generic over the handle types so this crate never depends on the
//! concrete `libsql`/`redis` clients — `libs/usecase` instantiates it with
//! the real handles.

use crate::errors::RouterError;

/// Per-request routing hints. A populated `tenant_*` field overrides the
/// router's static handle for that module.
#[derive(Debug, Clone, Default)]
pub struct RequestContext<R, C> {
    pub tenant_relational: Option<R>,
    pub tenant_cache: Option<C>,
}

impl<R, C> RequestContext<R, C> {
    pub fn new() -> Self {
        Self {
            tenant_relational: None,
            tenant_cache: None,
        }
    }
}

pub trait DataSourceRouter<R: Clone, C: Clone> {
    /// Returns the relational handle for this request: the tenant-attached
    /// handle if present, else the statically configured one.
    fn relational(&self, ctx: &RequestContext<R, C>) -> Result<R, RouterError>;

    /// Returns the cache handle for this request, same precedence rule.
    fn cache(&self, ctx: &RequestContext<R, C>) -> Result<C, RouterError>;
}

/// Default router: a single statically-configured handle per module,
/// overridden per-request by the context's tenant handle when present.
/// Never blocks — handle pools are owned by the handles themselves.
#[derive(Debug, Clone)]
pub struct StaticRouter<R, C> {
    relational: Option<R>,
    cache: Option<C>,
}

impl<R: Clone, C: Clone> StaticRouter<R, C> {
    pub fn new(relational: Option<R>, cache: Option<C>) -> Self {
        Self { relational, cache }
    }
}

impl<R: Clone, C: Clone> DataSourceRouter<R, C> for StaticRouter<R, C> {
    fn relational(&self, ctx: &RequestContext<R, C>) -> Result<R, RouterError> {
        if let Some(handle) = &ctx.tenant_relational {
            return Ok(handle.clone());
        }
        self.relational.clone().ok_or_else(|| RouterError::NoConnection {
            module: "relational".to_string(),
        })
    }

    fn cache(&self, ctx: &RequestContext<R, C>) -> Result<C, RouterError> {
        if let Some(handle) = &ctx.tenant_cache {
            return Ok(handle.clone());
        }
        self.cache.clone().ok_or_else(|| RouterError::NoConnection {
            module: "cache".to_string(),
        })
    }
}
