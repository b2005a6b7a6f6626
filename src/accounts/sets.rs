use std::sync::Arc;

use serde::Serialize;

use super::blocking::BlockingEntry;
use super::blocking_index::BlockingIndex;
use super::ids::{Account, BlockHash};
use super::priority::{PriorityEntry, PRIORITY_CUTOFF, PRIORITY_DIVIDE, PRIORITY_INCREASE, PRIORITY_INITIAL, PRIORITY_MAX};
use super::priority_index::PriorityIndex;
use super::stats::StatsSink;

/// Hard caps and scheduling parameters for an `AccountSets` instance.
#[derive(Debug, Clone, Copy)]
pub struct AccountSetsConfig {
    pub priorities_max: usize,
    pub blocking_max: usize,
}

impl Default for AccountSetsConfig {
    fn default() -> Self {
        Self {
            priorities_max: 4096,
            blocking_max: 4096,
        }
    }
}

/// Deep-copied snapshot returned by `AccountSets::info`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountSetsInfo {
    pub priorities: Vec<PriorityEntry>,
    pub blocking: Vec<BlockingEntry>,
}

impl AccountSetsInfo {
    /// Renders the snapshot as pretty-printed JSON, for logging or a
    /// debug endpoint. Infallible: every field here is plain data.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("AccountSetsInfo is always serializable")
    }
}

/// Snapshot returned by `AccountSets::container_info`: the same two views
/// plus the size of the blocking set's "unknown dependency account" bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContainerInfo {
    pub priorities_count: usize,
    pub blocking_count: usize,
    pub blocking_unknown: usize,
}

impl ContainerInfo {
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("ContainerInfo is always serializable")
    }
}

/// Orchestrates the priority index (C1) and the blocking index (C2): boost
/// and decay arithmetic, block/unblock transitions, dependency resolution,
/// and overflow eviction. Not `Send`/`Sync` by itself — callers share it
/// behind a single exclusive lock (see `engine::Engine`), which is what
/// makes every method here free to assume exclusive access to both indices
/// for its whole duration.
pub struct AccountSets {
    config: AccountSetsConfig,
    stats: Arc<dyn StatsSink>,
    priorities: PriorityIndex,
    blocking: BlockingIndex,
}

impl AccountSets {
    pub fn new(config: AccountSetsConfig, stats: Arc<dyn StatsSink>) -> Self {
        Self {
            config,
            stats,
            priorities: PriorityIndex::new(),
            blocking: BlockingIndex::new(),
        }
    }

    pub fn priority_up(&mut self, account: Account) {
        if account.is_zero() {
            return;
        }

        if self.blocking.contains(account) {
            self.stats.inc("prioritize_failed");
            return;
        }

        self.stats.inc("prioritize");
        match self.priorities.get(account) {
            Some(entry) => {
                let boosted = (entry.priority + PRIORITY_INCREASE).min(PRIORITY_MAX);
                self.priorities.set_priority(account, boosted);
            }
            None => {
                self.stats.inc("priority_insert");
                self.priorities.insert(PriorityEntry::new(account));
                self.trim_overflow();
            }
        }
    }

    pub fn priority_down(&mut self, account: Account) {
        if account.is_zero() {
            return;
        }

        let Some(entry) = self.priorities.get(account) else {
            self.stats.inc("deprioritize_failed");
            return;
        };

        self.stats.inc("deprioritize");
        let decayed = entry.priority / PRIORITY_DIVIDE;
        if decayed <= PRIORITY_CUTOFF {
            self.stats.inc("priority_erase_by_threshold");
            self.priorities.remove(account);
        } else {
            self.priorities.set_priority(account, decayed);
        }
    }

    pub fn priority_set(&mut self, account: Account) {
        if account.is_zero() {
            return;
        }

        if self.blocking.contains(account) {
            self.stats.inc("prioritize_failed");
            return;
        }

        if !self.priorities.contains(account) {
            self.stats.inc("priority_insert");
            self.priorities.insert(PriorityEntry::new(account));
            self.trim_overflow();
        }
    }

    /// Precondition: `account != Account::ZERO`. Violating this is a caller
    /// bug, not a runtime error mode (§7).
    pub fn block(&mut self, account: Account, dependency: BlockHash) {
        debug_assert!(!account.is_zero());

        self.stats.inc("block");

        let original = self
            .priorities
            .remove(account)
            .unwrap_or_else(PriorityEntry::zero_sentinel);
        self.stats.inc("priority_erase_by_blocking");

        self.blocking
            .insert(BlockingEntry::new(account, original, dependency));
        self.stats.inc("blocking_insert");

        self.trim_overflow();
    }

    pub fn unblock(&mut self, account: Account, hash: Option<BlockHash>) {
        if account.is_zero() {
            return;
        }

        let matches = match self.blocking.get(account) {
            Some(entry) => match hash {
                None => true,
                Some(h) => h == entry.dependency,
            },
            None => false,
        };

        if !matches {
            self.stats.inc("unblock_failed");
            return;
        }

        self.stats.inc("unblock");
        let entry = self.blocking.remove(account).expect("checked above");

        debug_assert!(!self.priorities.contains(account));
        if entry.original.account.is_zero() {
            self.priorities.insert(PriorityEntry::new(account));
        } else {
            debug_assert_eq!(entry.original.account, account);
            self.priorities.insert(entry.original);
        }

        self.trim_overflow();
    }

    /// Precondition: `dependency_account != Account::ZERO`.
    pub fn dependency_update(&mut self, hash: BlockHash, dependency_account: Account) {
        debug_assert!(!dependency_account.is_zero());

        if !self.blocking.has_dependency(hash) {
            self.stats.inc("dependency_update_failed");
            return;
        }

        let changed = self.blocking.update_dependency_account(hash, dependency_account);
        for _ in 0..changed {
            self.stats.inc("dependency_update");
        }
    }

    pub fn sync_dependencies(&mut self) {
        let candidates: Vec<Account> = self
            .blocking
            .with_known_dependency_account()
            .map(|entry| entry.dependency_account)
            .collect();

        for dependency_account in candidates {
            if self.priorities.len() >= self.config.priorities_max {
                break;
            }
            if !self.blocking.contains(dependency_account)
                && !self.priorities.contains(dependency_account)
            {
                self.stats.inc("sync_dependencies");
                self.priority_set(dependency_account);
            }
        }

        self.trim_overflow();
    }

    fn trim_overflow(&mut self) {
        while self.priorities.len() > self.config.priorities_max {
            self.priorities.pop_front();
            self.stats.inc("priority_erase_overflow");
        }
        while self.blocking.len() > self.config.blocking_max {
            self.blocking.pop_front();
            self.stats.inc("blocking_erase_overflow");
        }
    }

    pub fn blocked(&self, account: Account) -> bool {
        self.blocking.contains(account)
    }

    pub fn prioritized(&self, account: Account) -> bool {
        self.priorities.contains(account)
    }

    pub fn priority(&self, account: Account) -> f64 {
        if self.blocked(account) {
            return 0.0;
        }
        self.priorities.get(account).map(|e| e.priority).unwrap_or(0.0)
    }

    pub fn priority_size(&self) -> usize {
        self.priorities.len()
    }

    pub fn blocked_size(&self) -> usize {
        self.blocking.len()
    }

    pub fn priority_half_full(&self) -> bool {
        self.priorities.len() > self.config.priorities_max / 2
    }

    pub fn blocked_half_full(&self) -> bool {
        self.blocking.len() > self.config.blocking_max / 2
    }

    pub fn info(&self) -> AccountSetsInfo {
        AccountSetsInfo {
            priorities: self.priorities.clone_entries(),
            blocking: self.blocking.clone_entries(),
        }
    }

    pub fn container_info(&self) -> ContainerInfo {
        ContainerInfo {
            priorities_count: self.priorities.len(),
            blocking_count: self.blocking.len(),
            blocking_unknown: self.blocking.unknown_count(),
        }
    }

    pub(super) fn priorities(&self) -> &PriorityIndex {
        &self.priorities
    }

    pub(super) fn priorities_mut(&mut self) -> &mut PriorityIndex {
        &mut self.priorities
    }

    pub(super) fn blocking_index(&self) -> &BlockingIndex {
        &self.blocking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::ids::{test_account, test_hash};
    use crate::accounts::stats::Stats;

    fn sets(priorities_max: usize, blocking_max: usize) -> AccountSets {
        AccountSets::new(
            AccountSetsConfig {
                priorities_max,
                blocking_max,
            },
            Arc::new(Stats::default()),
        )
    }

    #[test]
    fn priority_up_on_zero_account_is_a_noop() {
        let mut s = sets(10, 10);
        s.priority_up(Account::ZERO);
        assert_eq!(s.priority_size(), 0);
    }

    #[test]
    fn priority_up_inserts_at_initial_then_boosts() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        s.priority_up(a);
        assert_eq!(s.priority(a), PRIORITY_INITIAL);
        s.priority_up(a);
        assert_eq!(s.priority(a), PRIORITY_INITIAL + PRIORITY_INCREASE);
    }

    #[test]
    fn priority_up_saturates_at_max() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        for _ in 0..64 {
            s.priority_up(a);
        }
        assert_eq!(s.priority(a), PRIORITY_MAX);
        s.priority_up(a);
        assert_eq!(s.priority(a), PRIORITY_MAX);
    }

    #[test]
    fn priority_up_while_blocked_fails() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        s.block(a, test_hash(1));
        s.priority_up(a);
        assert!(!s.prioritized(a));
        assert_eq!(s.priority_size(), 0);
    }

    #[test]
    fn decay_to_cutoff_erases_entry() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        s.priority_up(a); // 2.0
        s.priority_down(a); // 1.0
        assert_eq!(s.priority(a), 1.0);
        s.priority_down(a); // 0.5
        assert_eq!(s.priority(a), 0.5);
        s.priority_down(a); // 0.25
        assert_eq!(s.priority(a), 0.25);
        s.priority_down(a); // 0.125 <= cutoff(0.15) -> erased
        assert!(!s.prioritized(a));
        assert_eq!(s.priority(a), 0.0);
    }

    #[test]
    fn priority_down_on_absent_account_bumps_failure_counter_only() {
        let mut s = sets(10, 10);
        s.priority_down(test_account(1));
        assert_eq!(s.priority_size(), 0);
    }

    #[test]
    fn block_then_unblock_with_matching_hash_restores_priority() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        let h = test_hash(1);
        s.priority_up(a);
        s.priority_up(a);
        assert_eq!(s.priority(a), 4.0);

        s.block(a, h);
        assert!(!s.prioritized(a));
        assert!(s.blocked(a));
        assert_eq!(s.priority(a), 0.0);

        s.unblock(a, Some(h));
        assert!(s.prioritized(a));
        assert!(!s.blocked(a));
        assert_eq!(s.priority(a), 4.0);
    }

    #[test]
    fn unblock_with_mismatched_hash_is_ignored() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        s.block(a, test_hash(1));
        s.unblock(a, Some(test_hash(2)));
        assert!(s.blocked(a));
    }

    #[test]
    fn unblock_with_no_hash_constraint_always_matches() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        s.block(a, test_hash(1));
        s.unblock(a, None);
        assert!(!s.blocked(a));
    }

    #[test]
    fn unblock_of_account_with_no_prior_priority_inserts_fresh() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        let h = test_hash(1);
        s.block(a, h);
        s.unblock(a, Some(h));
        assert_eq!(s.priority(a), PRIORITY_INITIAL);
    }

    #[test]
    fn dependency_update_promotes_dependency_account_via_sync() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        let b = test_account(2);
        let h = test_hash(1);

        s.block(a, h);
        s.dependency_update(h, b);
        s.sync_dependencies();

        assert!(s.prioritized(b));
        assert_eq!(s.priority(b), PRIORITY_INITIAL);
        assert!(s.blocked(a));
    }

    #[test]
    fn dependency_update_on_unknown_hash_bumps_failure_counter() {
        let mut s = sets(10, 10);
        s.dependency_update(test_hash(1), test_account(1));
        assert_eq!(s.blocked_size(), 0);
    }

    #[test]
    fn dependency_update_is_idempotent_on_repeated_identical_call() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        let b = test_account(2);
        let h = test_hash(1);
        s.block(a, h);

        s.dependency_update(h, b);
        let entry = s.blocking_index().get(a).unwrap();
        assert_eq!(entry.dependency_account, b);

        // second call with the same depA should not panic or corrupt state
        s.dependency_update(h, b);
        let entry = s.blocking_index().get(a).unwrap();
        assert_eq!(entry.dependency_account, b);
    }

    #[test]
    fn overflow_evicts_by_insertion_age_not_by_priority() {
        let mut s = sets(3, 10);
        let accounts: Vec<_> = (1..=4).map(test_account).collect();
        s.priority_set(accounts[0]);
        s.priority_set(accounts[1]);
        s.priority_set(accounts[2]);

        for _ in 0..10 {
            s.priority_up(accounts[1]);
        }

        s.priority_set(accounts[3]);

        assert!(!s.prioritized(accounts[0]));
        assert!(s.prioritized(accounts[1]));
        assert!(s.prioritized(accounts[2]));
        assert!(s.prioritized(accounts[3]));
        assert_eq!(s.priority_size(), 3);
    }

    #[test]
    fn disjointness_holds_across_block_and_unblock() {
        let mut s = sets(10, 10);
        let a = test_account(1);
        s.priority_up(a);
        s.block(a, test_hash(1));
        assert!(!(s.prioritized(a) && s.blocked(a)));
        s.unblock(a, None);
        assert!(!(s.prioritized(a) && s.blocked(a)));
    }

    #[test]
    fn priority_half_full_is_strict() {
        let mut s = sets(4, 10);
        s.priority_set(test_account(1));
        s.priority_set(test_account(2));
        assert!(!s.priority_half_full());
        s.priority_set(test_account(3));
        assert!(s.priority_half_full());
    }

    #[test]
    fn info_snapshot_serializes_to_json() {
        let mut s = sets(10, 10);
        s.priority_up(test_account(1));
        s.block(test_account(2), test_hash(1));

        let json = s.info().to_json_pretty();
        assert!(json.contains("\"priorities\""));
        assert!(json.contains("\"blocking\""));
    }

    #[test]
    fn container_info_reports_unknown_blocking_bucket() {
        let mut s = sets(10, 10);
        s.block(test_account(1), test_hash(1));
        let info = s.container_info();
        assert_eq!(info.blocking_count, 1);
        assert_eq!(info.blocking_unknown, 1);
    }
}
