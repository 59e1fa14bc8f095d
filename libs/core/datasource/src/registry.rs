// [libs/core/datasource/src/registry.rs]
//! Process-wide connection state: the cache, relational, document-store,
//! and gRPC connection handles are initialized once and disposed at
//! shutdown. Generic over handle types for the same reason as
//! [`crate::router`] — modeled on `TursoClient`, an `Arc`-backed handle
//! wrapper held for the life of the process.

#[derive(Debug, Clone)]
pub struct ConnectionRegistry<REL, CACHE, DOC, GRPC> {
    relational: REL,
    cache: CACHE,
    document: DOC,
    grpc: GRPC,
}

impl<REL: Clone, CACHE: Clone, DOC: Clone, GRPC: Clone> ConnectionRegistry<REL, CACHE, DOC, GRPC> {
    pub fn bootstrap(relational: REL, cache: CACHE, document: DOC, grpc: GRPC) -> Self {
        Self {
            relational,
            cache,
            document,
            grpc,
        }
    }

    pub fn relational(&self) -> REL {
        self.relational.clone()
    }

    pub fn cache(&self) -> CACHE {
        self.cache.clone()
    }

    pub fn document(&self) -> DOC {
        self.document.clone()
    }

    pub fn grpc(&self) -> GRPC {
        self.grpc.clone()
    }
}
