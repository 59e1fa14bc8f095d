// [libs/infra/cache/src/scripts/balance_engine.rs]
//! The atomic balance-mutation script. Runs under the cache's
//! single-threaded execution guarantee: every balance a single invocation
//! touches is read, validated, and written back before any other command
//! on the instance can interleave.

use super::decimal_lua::DECIMAL_LUA;
use crate::errors::CacheError;
use ledgercore_domain::{BalanceOperation, OperationType, TransactionStatusCode};
use redis::aio::ConnectionManager;
use redis::Script;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Per-operation tuple, ARGV order bit-exact to the script's wire contract:
/// `(physKey, isPending, status, op, amount, alias, balanceId, available,
/// onHold, version, accountType, allowSending, allowReceiving, assetCode,
/// accountId, secondaryKey)`.
fn push_argv(cmd: &mut Vec<String>, op: &BalanceOperation, status: TransactionStatusCode) {
    cmd.push(op.physical_key.clone());
    cmd.push(if op.is_pending { "1" } else { "0" }.to_string());
    cmd.push(status_str(status).to_string());
    cmd.push(operation_str(op.amount.operation).to_string());
    cmd.push(op.amount.value.to_string());
    cmd.push(op.alias.clone());
    cmd.push(op.balance.id.to_string());
    cmd.push(op.balance.available.to_string());
    cmd.push(op.balance.on_hold.to_string());
    cmd.push(op.balance.version.to_string());
    cmd.push(op.balance.account_type.0.clone());
    cmd.push(if op.balance.allow_sending { "1" } else { "0" }.to_string());
    cmd.push(if op.balance.allow_receiving { "1" } else { "0" }.to_string());
    cmd.push(op.amount.asset_code.clone());
    cmd.push(op.balance.account_id.to_string());
    cmd.push(op.balance.secondary_key.clone());
}

fn status_str(status: TransactionStatusCode) -> &'static str {
    match status {
        TransactionStatusCode::Created => "CREATED",
        TransactionStatusCode::Approved => "APPROVED",
        TransactionStatusCode::Noted => "NOTED",
        TransactionStatusCode::Cancelled => "CANCELLED",
        TransactionStatusCode::Denied => "DENIED",
    }
}

fn operation_str(operation: OperationType) -> &'static str {
    match operation {
        OperationType::Debit => "DEBIT",
        OperationType::Credit => "CREDIT",
    }
}

/// One entry of the JSON array the script returns, ordered to match the
/// ARGV it was invoked with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSnapshotResult {
    pub alias: String,
    #[serde(rename = "balanceId")]
    pub balance_id: String,
    pub available: String,
    #[serde(rename = "onHold")]
    pub on_hold: String,
    pub version: u64,
}

pub struct BalanceEngine {
    script: Script,
}

impl Default for BalanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceEngine {
    pub fn new() -> Self {
        Self {
            script: Script::new(&full_script()),
        }
    }

    /// Invokes the script over `ops`, returning snapshots in ARGV order on
    /// success, or a typed [`CacheError`] business/infrastructure error.
    #[instrument(skip(self, connection, ops))]
    pub async fn apply(
        &self,
        connection: &mut ConnectionManager,
        outbox_key: &str,
        transaction_key: &str,
        schedule_key: &str,
        schedule_sync_enabled: bool,
        status: TransactionStatusCode,
        ops: &[BalanceOperation],
    ) -> Result<Vec<BalanceSnapshotResult>, CacheError> {
        let mut argv = Vec::with_capacity(ops.len() * 16);
        for op in ops {
            push_argv(&mut argv, op, status);
        }

        let mut invocation = self
            .script
            .key(outbox_key)
            .key(transaction_key)
            .key(schedule_key)
            .arg(if schedule_sync_enabled { "1" } else { "0" });
        for value in &argv {
            invocation = invocation.arg(value);
        }

        let raw: String = invocation
            .invoke_async(connection)
            .await
            .map_err(map_script_error)?;

        serde_json::from_str(&raw).map_err(CacheError::from)
    }
}

/// Maps the script's typed error-string replies (`ErrInsufficientFunds:
/// <alias>`, etc. — the script re-emits the original typed error) back
/// onto [`CacheError`] business variants.
fn map_script_error(error: redis::RedisError) -> CacheError {
    let detail = error.to_string();
    if let Some((code, alias)) = detail.split_once(':') {
        let alias = alias.trim().to_string();
        match code.trim() {
            "ErrInsufficientFunds" => return CacheError::InsufficientFunds { alias },
            "ErrOnHoldExternalAccount" => return CacheError::OnHoldExternalAccount { alias },
            "ErrSendReceivingDenied" => return CacheError::SendReceivingDenied { alias },
            _ => {}
        }
    }
    CacheError::Command(error)
}

fn full_script() -> String {
    format!(
        r#"
local decimal = (function()
{decimal_lua}
end)()

local schedule_sync_enabled = tonumber(ARGV[1])
local per_op_argv = 16

local ops = {{}}
local idx = 2
while ARGV[idx] ~= nil do
  local op = {{
    phys_key = ARGV[idx],
    is_pending = ARGV[idx + 1] == "1",
    status = ARGV[idx + 2],
    operation = ARGV[idx + 3],
    amount = ARGV[idx + 4],
    alias = ARGV[idx + 5],
    balance_id = ARGV[idx + 6],
    available = ARGV[idx + 7],
    on_hold = ARGV[idx + 8],
    version = ARGV[idx + 9],
    account_type = ARGV[idx + 10],
    allow_sending = ARGV[idx + 11] == "1",
    allow_receiving = ARGV[idx + 12] == "1",
    asset_code = ARGV[idx + 13],
    account_id = ARGV[idx + 14],
    secondary_key = ARGV[idx + 15],
  }}
  table.insert(ops, op)
  idx = idx + per_op_argv
end

local rollback_order = {{}}
local rollback_entries = {{}}
local scheduled_this_call = {{}}
local results = {{}}
local tx_status = ops[1] and ops[1].status or "APPROVED"

local function rollback_all()
  for i = #rollback_order, 1, -1 do
    local key = rollback_order[i]
    local entry = rollback_entries[key]
    if entry.existed then
      redis.call("HSET", key, "available", entry.available, "on_hold", entry.on_hold, "version", entry.version)
    else
      redis.call("DEL", key)
    end
    if scheduled_this_call[key] then
      redis.call("ZREM", KEYS[3], key)
    end
  end
end

local function fail(code, alias)
  rollback_all()
  return redis.error_reply(code .. ":" .. alias)
end

for _, op in ipairs(ops) do
  local existed = redis.call("EXISTS", op.phys_key) == 1

  if not existed then
    redis.call("HSET", op.phys_key,
      "available", op.available,
      "on_hold", op.on_hold,
      "version", op.version,
      "account_type", op.account_type,
      "allow_sending", op.allow_sending and "1" or "0",
      "allow_receiving", op.allow_receiving and "1" or "0",
      "asset_code", op.asset_code,
      "account_id", op.account_id,
      "alias", op.alias,
      "balance_id", op.balance_id,
      "secondary_key", op.secondary_key)
  end

  if not rollback_entries[op.phys_key] then
    if existed then
      local prev = redis.call("HMGET", op.phys_key, "available", "on_hold", "version")
      rollback_entries[op.phys_key] = {{ existed = true, available = prev[1], on_hold = prev[2], version = prev[3] }}
    else
      rollback_entries[op.phys_key] = {{ existed = false }}
    end
    table.insert(rollback_order, op.phys_key)
  end

  local fields = redis.call("HMGET", op.phys_key, "allow_sending", "allow_receiving", "account_type", "available", "on_hold", "version")
  local allow_sending, allow_receiving, account_type = fields[1] == "1", fields[2] == "1", fields[3]
  local current_available, current_on_hold, current_version = fields[4], fields[5], tonumber(fields[6])

  if op.operation == "DEBIT" and not allow_sending then
    return fail("ErrSendReceivingDenied", op.alias)
  end
  if op.operation == "CREDIT" and not allow_receiving then
    return fail("ErrSendReceivingDenied", op.alias)
  end

  if op.is_pending and account_type == "external" then
    return fail("ErrOnHoldExternalAccount", op.alias)
  end

  local target_field = op.is_pending and "on_hold" or "available"
  local current_value = target_field == "on_hold" and current_on_hold or current_available

  local sign_cur, digits_cur, sign_amt, digits_amt, scale = decimal.align(current_value, op.amount)
  local direction = op.operation == "DEBIT" and -1 or 1
  local new_sign, new_digits = decimal.add_signed(sign_cur, digits_cur, direction * sign_amt, digits_amt)
  local new_value = decimal.format(new_sign, new_digits, scale)
  local is_negative = decimal.is_negative(new_sign, new_digits)

  if is_negative and target_field == "available" and account_type ~= "external" then
    return fail("ErrInsufficientFunds", op.alias)
  end
  if is_negative and target_field == "on_hold" then
    return fail("ErrInsufficientFunds", op.alias)
  end

  local new_version = current_version + 1
  redis.call("HSET", op.phys_key, target_field, new_value, "version", new_version)

  if schedule_sync_enabled == 1 then
    local now = redis.call("TIME")[1]
    redis.call("ZADD", KEYS[3], now, op.phys_key)
    scheduled_this_call[op.phys_key] = true
  end

  table.insert(results, {{
    alias = op.alias,
    balanceId = op.balance_id,
    available = target_field == "available" and new_value or current_available,
    onHold = target_field == "on_hold" and new_value or current_on_hold,
    version = new_version,
  }})
end

local encoded = cjson.encode(results)
redis.call("HSET", KEYS[1], KEYS[2], cjson.encode({{ status = tx_status, balances = results }}))
return encoded
"#,
        decimal_lua = DECIMAL_LUA,
    )
}
