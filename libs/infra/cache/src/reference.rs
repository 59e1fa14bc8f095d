// [libs/infra/cache/src/reference.rs]
//! A pure-Rust model of the BalanceEngine and SyncScheduler scripts,
//! executing the same algorithm as `scripts::balance_engine` and
//! `scripts::scheduler` over an in-process map instead of a live Redis
//! instance. Exists so property and scenario tests can run deterministically
//! without a running cache — any divergence between this model and the Lua
//! scripts would be a bug in one of them, since both are required to
//! implement identical rescale/rollback rules.

use ledgercore_domain::{Balance, BalanceOperation, DomainError, OperationType};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ReferenceCache {
    balances: HashMap<String, Balance>,
    schedule: HashMap<String, i64>,
    leases: HashMap<String, i64>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&mut self, physical_key: impl Into<String>, balance: Balance) {
        self.balances.insert(physical_key.into(), balance);
    }

    pub fn get(&self, physical_key: &str) -> Option<&Balance> {
        self.balances.get(physical_key)
    }

    pub fn is_scheduled(&self, physical_key: &str) -> bool {
        self.schedule.contains_key(physical_key)
    }

    pub fn schedule_score(&self, physical_key: &str) -> Option<i64> {
        self.schedule.get(physical_key).copied()
    }

    pub fn schedule_len(&self) -> usize {
        self.schedule.len()
    }

    /// Applies every operation in ARGV order, mutating balances in place.
    /// On any business-rule failure, restores every balance and schedule
    /// entry touched during this call to its pre-invocation state and
    /// returns the triggering error — mirroring the Lua script's rollback
    /// sub-routine byte-for-byte in effect.
    pub fn apply(
        &mut self,
        schedule_sync_enabled: bool,
        now: i64,
        ops: &[BalanceOperation],
    ) -> Result<Vec<Balance>, DomainError> {
        let mut snapshots: HashMap<String, Option<Balance>> = HashMap::new();
        let mut scheduled_this_call: Vec<String> = Vec::new();
        let mut results = Vec::with_capacity(ops.len());

        for op in ops {
            let key = &op.physical_key;

            if !self.balances.contains_key(key) {
                self.balances.insert(key.clone(), op.balance.clone());
            }

            snapshots
                .entry(key.clone())
                .or_insert_with(|| self.balances.get(key).cloned());

            let current = self.balances.get(key).expect("seeded above").clone();

            if op.amount.operation == OperationType::Debit && !current.allow_sending {
                self.rollback(&snapshots, &scheduled_this_call);
                return Err(DomainError::SendReceivingDenied {
                    alias: op.alias.clone(),
                });
            }
            if op.amount.operation == OperationType::Credit && !current.allow_receiving {
                self.rollback(&snapshots, &scheduled_this_call);
                return Err(DomainError::SendReceivingDenied {
                    alias: op.alias.clone(),
                });
            }
            if op.is_pending && current.account_type.is_external() {
                self.rollback(&snapshots, &scheduled_this_call);
                return Err(DomainError::OnHoldExternalAccount {
                    alias: op.alias.clone(),
                });
            }

            let direction = match op.amount.operation {
                OperationType::Debit => -1,
                OperationType::Credit => 1,
            };
            let signed_amount = if direction < 0 {
                op.amount.value.neg()
            } else {
                op.amount.value.clone()
            };

            let mut updated = current.clone();
            if op.is_pending {
                updated.on_hold = updated.on_hold.checked_add(&signed_amount);
            } else {
                updated.available = updated.available.checked_add(&signed_amount);
            }

            let available_invariant_ok =
                updated.account_type.is_external() || !updated.available.is_negative();
            if !available_invariant_ok {
                self.rollback(&snapshots, &scheduled_this_call);
                return Err(DomainError::InsufficientFunds {
                    alias: op.alias.clone(),
                });
            }
            if updated.on_hold.is_negative() {
                self.rollback(&snapshots, &scheduled_this_call);
                return Err(DomainError::InsufficientFunds {
                    alias: op.alias.clone(),
                });
            }

            updated.version += 1;
            self.balances.insert(key.clone(), updated.clone());

            if schedule_sync_enabled {
                self.schedule.insert(key.clone(), now);
                scheduled_this_call.push(key.clone());
            }

            results.push(updated);
        }

        Ok(results)
    }

    fn rollback(&mut self, snapshots: &HashMap<String, Option<Balance>>, scheduled: &[String]) {
        for (key, previous) in snapshots {
            match previous {
                Some(balance) => {
                    self.balances.insert(key.clone(), balance.clone());
                }
                None => {
                    self.balances.remove(key);
                }
            }
        }
        for key in scheduled {
            self.schedule.remove(key);
        }
    }

    /// Mirrors the claim script: oldest-due first, limited to
    /// `max_claims`, each claim granted only if its lease is free.
    pub fn claim_due(&mut self, now: i64, max_claims: usize, lease_ttl: i64) -> Vec<String> {
        let mut due: Vec<(String, i64)> = self
            .schedule
            .iter()
            .filter(|(_, score)| **score <= now)
            .map(|(member, score)| (member.clone(), *score))
            .collect();
        due.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut claimed = Vec::new();
        for (member, _) in due.into_iter().take(max_claims) {
            let lease_free = self
                .leases
                .get(&member)
                .map(|expires_at| *expires_at <= now)
                .unwrap_or(true);
            if lease_free {
                self.leases.insert(member.clone(), now + lease_ttl);
                claimed.push(member);
            }
        }
        claimed
    }

    pub fn unschedule(&mut self, member: &str) {
        self.schedule.remove(member);
        self.leases.remove(member);
    }
}
