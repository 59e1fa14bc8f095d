// [libs/infra/cache/src/scripts/scheduler.rs]
//! The claim/unschedule atomic scripts. Claiming is race-free because the
//! find-then-lease sequence runs inside a single script invocation;
//! different cache instances coordinate only through the lease keys'
//! set-if-absent semantics.

use crate::errors::CacheError;
use redis::aio::ConnectionManager;
use redis::Script;
use tracing::instrument;

const CLAIM_DUE_SCRIPT: &str = r#"
local schedule_key = KEYS[1]
local max_claims = tonumber(ARGV[1])
local lease_ttl_seconds = tonumber(ARGV[2])
local lease_prefix = ARGV[3]

local now = redis.call("TIME")[1]
local candidates = redis.call("ZRANGEBYSCORE", schedule_key, "-inf", now, "LIMIT", 0, max_claims)

local claimed = {}
for _, member in ipairs(candidates) do
  local lease_key = lease_prefix .. member
  local acquired = redis.call("SET", lease_key, "1", "NX", "EX", lease_ttl_seconds)
  if acquired then
    table.insert(claimed, member)
  end
end

return claimed
"#;

const UNSCHEDULE_SCRIPT: &str = r#"
local schedule_key = KEYS[1]
local member = ARGV[1]
local lease_prefix = ARGV[2]

redis.call("ZREM", schedule_key, member)
redis.call("DEL", lease_prefix .. member)

return redis.status_reply("OK")
"#;

pub struct SyncScheduler {
    claim_due: Script,
    unschedule: Script,
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncScheduler {
    pub fn new() -> Self {
        Self {
            claim_due: Script::new(CLAIM_DUE_SCRIPT),
            unschedule: Script::new(UNSCHEDULE_SCRIPT),
        }
    }

    /// Claims up to `max_claims` due members, oldest-due first, granting
    /// each a `lease_ttl_seconds` lease under `lease_prefix`. An empty
    /// result is a valid "nothing to do" answer.
    #[instrument(skip(self, connection))]
    pub async fn claim_due(
        &self,
        connection: &mut ConnectionManager,
        schedule_key: &str,
        max_claims: u32,
        lease_ttl_seconds: u32,
        lease_prefix: &str,
    ) -> Result<Vec<String>, CacheError> {
        self.claim_due
            .key(schedule_key)
            .arg(max_claims)
            .arg(lease_ttl_seconds)
            .arg(lease_prefix)
            .invoke_async(connection)
            .await
            .map_err(CacheError::from)
    }

    /// Removes `member` from the schedule and releases its lease.
    /// Idempotent: safe to call even if either side effect already
    /// happened.
    #[instrument(skip(self, connection))]
    pub async fn unschedule(
        &self,
        connection: &mut ConnectionManager,
        schedule_key: &str,
        member: &str,
        lease_prefix: &str,
    ) -> Result<(), CacheError> {
        let _: redis::Value = self
            .unschedule
            .key(schedule_key)
            .arg(member)
            .arg(lease_prefix)
            .invoke_async(connection)
            .await
            .map_err(CacheError::from)?;
        Ok(())
    }
}
