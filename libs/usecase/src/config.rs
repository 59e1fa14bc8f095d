// [libs/usecase/src/config.rs]
//! Coordinator-level configuration: whether a missing balance in the
//! returned-alias map should be logged-and-skipped or treated as fatal is a
//! judgment call rather than a fixed behavior, so it's exposed as a
//! configurable strictness flag rather than picked silently. The timeout
//! pair follows spec §5: "cache calls should carry a short deadline
//! (milliseconds); relational calls a longer one (seconds)".

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// When `true` (the default), a BalanceEngine result missing an alias
    /// the coordinator expected is surfaced as
    /// [`ledgercore_domain::DomainError::ScriptResultType`] — a
    /// non-transient, fatal-to-the-request error, since silent skip would
    /// corrupt the balance/operation association. When `false`, the
    /// missing alias is logged and its operation is dropped from the
    /// result instead, for callers requiring the legacy lenient behavior.
    pub strict_alias_association: bool,

    /// Deadline applied to each call into the cache (the BalanceEngine
    /// script invocation). Short, per spec §5.
    pub cache_timeout: Duration,

    /// Deadline applied to each call into the relational store and the
    /// document store. Longer than `cache_timeout`, per spec §5.
    pub relational_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            strict_alias_association: true,
            cache_timeout: Duration::from_millis(200),
            relational_timeout: Duration::from_secs(5),
        }
    }
}
