use std::collections::HashSet;

use indexmap::IndexMap;
use std::collections::HashMap;

use super::blocking::BlockingEntry;
use super::ids::{Account, BlockHash};

/// Indexed container for the blocking set.
///
/// The primary store is an `IndexMap<Account, BlockingEntry>`, giving the
/// unique by-account lookup and insertion-order iteration/eviction. Two
/// auxiliary multimaps mirror the other two keys the spec requires
/// (`dependency` and `dependency_account`, the latter including the
/// zero-account "unknown" bucket) and are kept in sync by hand on every
/// mutation, matching the "primary map + auxiliary multimaps over the same
/// logical rows" composition recommended for multi-index containers without
/// a native equivalent.
#[derive(Debug, Default)]
pub struct BlockingIndex {
    by_account: IndexMap<Account, BlockingEntry>,
    by_dependency: HashMap<BlockHash, HashSet<Account>>,
    by_dependency_account: HashMap<Account, HashSet<Account>>,
}

impl BlockingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_account.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_account.is_empty()
    }

    pub fn contains(&self, account: Account) -> bool {
        self.by_account.contains_key(&account)
    }

    pub fn get(&self, account: Account) -> Option<&BlockingEntry> {
        self.by_account.get(&account)
    }

    pub fn insert(&mut self, entry: BlockingEntry) {
        let account = entry.account;
        self.by_dependency
            .entry(entry.dependency)
            .or_default()
            .insert(account);
        self.by_dependency_account
            .entry(entry.dependency_account)
            .or_default()
            .insert(account);
        self.by_account.insert(account, entry);
    }

    pub fn remove(&mut self, account: Account) -> Option<BlockingEntry> {
        let entry = self.by_account.shift_remove(&account)?;
        self.unindex(&entry);
        Some(entry)
    }

    pub fn pop_front(&mut self) -> Option<BlockingEntry> {
        let (_, entry) = self.by_account.shift_remove_index(0)?;
        self.unindex(&entry);
        Some(entry)
    }

    fn unindex(&mut self, entry: &BlockingEntry) {
        if let Some(set) = self.by_dependency.get_mut(&entry.dependency) {
            set.remove(&entry.account);
            if set.is_empty() {
                self.by_dependency.remove(&entry.dependency);
            }
        }
        if let Some(set) = self.by_dependency_account.get_mut(&entry.dependency_account) {
            set.remove(&entry.account);
            if set.is_empty() {
                self.by_dependency_account.remove(&entry.dependency_account);
            }
        }
    }

    /// Rewrites `dependency_account` for every row matching `hash`, keeping
    /// the `by_dependency_account` index in sync. Returns the number of rows
    /// actually changed (rows already carrying `new_dependency_account` are
    /// left untouched and don't count).
    pub fn update_dependency_account(
        &mut self,
        hash: BlockHash,
        new_dependency_account: Account,
    ) -> usize {
        let Some(accounts) = self.by_dependency.get(&hash).cloned() else {
            return 0;
        };

        let mut changed = 0;
        for account in accounts {
            let Some(entry) = self.by_account.get_mut(&account) else {
                continue;
            };
            if entry.dependency_account == new_dependency_account {
                continue;
            }

            let old_dependency_account = entry.dependency_account;
            entry.dependency_account = new_dependency_account;

            if let Some(set) = self.by_dependency_account.get_mut(&old_dependency_account) {
                set.remove(&account);
                if set.is_empty() {
                    self.by_dependency_account.remove(&old_dependency_account);
                }
            }
            self.by_dependency_account
                .entry(new_dependency_account)
                .or_default()
                .insert(account);

            changed += 1;
        }
        changed
    }

    /// Accounts whose dependency block hash is `hash` (the equal-range over
    /// the `dependency` key).
    pub fn has_dependency(&self, hash: BlockHash) -> bool {
        self.by_dependency.contains_key(&hash)
    }

    /// Insertion-order iteration over blocking rows whose dependency account
    /// is still unknown (the zero-account bucket of `dependency_account`).
    pub fn unknown_in_insertion_order(&self) -> impl Iterator<Item = &BlockingEntry> {
        let unknown = self.by_dependency_account.get(&Account::ZERO);
        self.by_account.values().filter(move |entry| {
            unknown
                .map(|set| set.contains(&entry.account))
                .unwrap_or(false)
        })
    }

    /// Rows whose dependency account is known (non-zero), independent of
    /// insertion order — matches `sync_dependencies`' "sample everything
    /// with a known dependency account" scan.
    pub fn with_known_dependency_account(&self) -> impl Iterator<Item = &BlockingEntry> {
        self.by_account
            .values()
            .filter(|entry| !entry.dependency_account.is_zero())
    }

    pub fn unknown_count(&self) -> usize {
        self.by_dependency_account
            .get(&Account::ZERO)
            .map(|set| set.len())
            .unwrap_or(0)
    }

    pub fn clone_entries(&self) -> Vec<BlockingEntry> {
        self.by_account.values().cloned().collect()
    }
}
