// [libs/infra/cache/src/scripts/mod.rs]
//! Server-side atomic scripts. Each script is embedded as a Lua source
//! constant, bit-exact to its KEYS/ARGV wire contract, plus a thin async
//! Rust wrapper that marshals arguments and parses the returned
//! `cjson`-encoded payload.

pub mod balance_engine;
pub mod decimal_lua;
pub mod scheduler;
