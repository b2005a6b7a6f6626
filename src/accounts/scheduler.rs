use super::clock::Timestamp;
use super::ids::{Account, BlockHash};
use super::sets::AccountSets;

impl AccountSets {
    /// Returns the highest-priority account that is off cooldown and passes
    /// `filter`, or `Account::ZERO` if none qualifies.
    ///
    /// Scans the priority set in insertion order, keeping the strictly
    /// greatest priority seen so far — ties resolve to the earliest
    /// insertion because a later equal priority never replaces an earlier
    /// one. That gives "priority descending, ties broken by insertion
    /// order" (§4.4) without maintaining a dedicated sorted index.
    pub fn next_priority<F>(&self, now: Timestamp, cooldown: std::time::Duration, mut filter: F) -> Account
    where
        F: FnMut(Account) -> bool,
    {
        if self.priorities().is_empty() {
            return Account::ZERO;
        }

        let cutoff = now.saturating_sub(cooldown);
        let mut best: Option<(Account, f64)> = None;
        for entry in self.priorities().iter() {
            if entry.timestamp > cutoff {
                continue;
            }
            if !filter(entry.account) {
                continue;
            }
            match best {
                Some((_, best_priority)) if entry.priority <= best_priority => {}
                _ => best = Some((entry.account, entry.priority)),
            }
        }
        best.map(|(account, _)| account).unwrap_or(Account::ZERO)
    }

    /// Returns the first (insertion order) dependency block hash among
    /// blocking rows whose dependency account is still unknown and which
    /// passes `filter`, or `BlockHash::ZERO` if none qualifies.
    pub fn next_blocking<F>(&self, mut filter: F) -> BlockHash
    where
        F: FnMut(BlockHash) -> bool,
    {
        if self.blocking_index().is_empty() {
            return BlockHash::ZERO;
        }

        for entry in self.blocking_index().unknown_in_insertion_order() {
            debug_assert!(entry.dependency_account.is_zero());
            if filter(entry.dependency) {
                return entry.dependency;
            }
        }
        BlockHash::ZERO
    }

    /// Precondition: `account != Account::ZERO`.
    pub fn timestamp_set(&mut self, account: Account, now: Timestamp) {
        debug_assert!(!account.is_zero());
        self.priorities_mut().set_timestamp(account, now);
    }

    /// Precondition: `account != Account::ZERO`.
    pub fn timestamp_reset(&mut self, account: Account) {
        debug_assert!(!account.is_zero());
        self.priorities_mut().set_timestamp(account, Timestamp::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::accounts::ids::test_account;
    use crate::accounts::sets::AccountSetsConfig;
    use crate::accounts::stats::Stats;

    fn sets() -> AccountSets {
        AccountSets::new(
            AccountSetsConfig {
                priorities_max: 10,
                blocking_max: 10,
            },
            Arc::new(Stats::default()),
        )
    }

    #[test]
    fn empty_priority_set_short_circuits_without_calling_filter() {
        let s = sets();
        let mut called = false;
        let result = s.next_priority(Timestamp::ZERO, Duration::from_secs(1), |_| {
            called = true;
            true
        });
        assert_eq!(result, Account::ZERO);
        assert!(!called);
    }

    #[test]
    fn picks_highest_priority_first() {
        let mut s = sets();
        let low = test_account(1);
        let high = test_account(2);
        s.priority_up(low);
        s.priority_up(high);
        s.priority_up(high);

        let picked = s.next_priority(Timestamp::ZERO, Duration::from_secs(1), |_| true);
        assert_eq!(picked, high);
    }

    #[test]
    fn ties_break_to_earliest_insertion() {
        let mut s = sets();
        let first = test_account(1);
        let second = test_account(2);
        s.priority_set(first);
        s.priority_set(second);

        let picked = s.next_priority(Timestamp::ZERO, Duration::from_secs(1), |_| true);
        assert_eq!(picked, first);
    }

    #[test]
    fn cooldown_suppresses_recently_sampled_account_until_it_elapses() {
        use crate::accounts::clock::test_ts;

        let mut s = sets();
        let a = test_account(1);
        s.priority_set(a);

        let t0 = test_ts(10_000);
        let cooldown = Duration::from_secs(1);
        assert_eq!(s.next_priority(t0, cooldown, |_| true), a);

        s.timestamp_set(a, t0);
        assert_eq!(s.next_priority(t0, cooldown, |_| true), Account::ZERO);

        let t1 = test_ts(10_000 + 1_001);
        assert_eq!(s.next_priority(t1, cooldown, |_| true), a);
    }

    #[test]
    fn filter_rejection_skips_account() {
        let mut s = sets();
        let a = test_account(1);
        s.priority_set(a);
        let picked = s.next_priority(Timestamp::ZERO, Duration::from_secs(1), |_| false);
        assert_eq!(picked, Account::ZERO);
    }

    #[test]
    fn next_blocking_only_considers_unknown_dependency_accounts() {
        let mut s = sets();
        let a = test_account(1);
        let b = test_account(2);
        let h1 = crate::accounts::ids::test_hash(1);
        let h2 = crate::accounts::ids::test_hash(2);
        s.block(a, h1);
        s.block(b, h2);
        s.dependency_update(h1, test_account(9));

        let picked = s.next_blocking(|_| true);
        assert_eq!(picked, h2);
    }

    #[test]
    fn empty_blocking_set_short_circuits_without_calling_filter() {
        let s = sets();
        let mut called = false;
        let result = s.next_blocking(|_| {
            called = true;
            true
        });
        assert_eq!(result, BlockHash::ZERO);
        assert!(!called);
    }
}
