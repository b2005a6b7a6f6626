use indexmap::IndexMap;

use super::clock::Timestamp;
use super::ids::Account;
use super::priority::PriorityEntry;

/// Indexed container for the priority set.
///
/// Backed by an `IndexMap`, which gives us both the unique by-account lookup
/// and insertion-order iteration (and `shift_remove` that preserves it) in a
/// single structure, matching the "primary hash map + insertion-order list"
/// half of a multi-index container. Priority-ordered sampling is done by the
/// caller scanning this insertion-order view directly (see `AccountSets::next_priority`);
/// a dedicated priority-sorted index isn't worth the upkeep at the bounded
/// sizes this container is capped to.
#[derive(Debug, Default)]
pub struct PriorityIndex {
    by_account: IndexMap<Account, PriorityEntry>,
}

impl PriorityIndex {
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

    pub fn get(&self, account: Account) -> Option<&PriorityEntry> {
        self.by_account.get(&account)
    }

    /// Inserts a fresh entry. Caller is responsible for having checked that
    /// `account` isn't already present.
    pub fn insert(&mut self, entry: PriorityEntry) {
        self.by_account.insert(entry.account, entry);
    }

    pub fn remove(&mut self, account: Account) -> Option<PriorityEntry> {
        self.by_account.shift_remove(&account)
    }

    pub fn set_priority(&mut self, account: Account, priority: f64) {
        if let Some(entry) = self.by_account.get_mut(&account) {
            entry.priority = priority;
        }
    }

    pub fn set_timestamp(&mut self, account: Account, timestamp: Timestamp) {
        if let Some(entry) = self.by_account.get_mut(&account) {
            entry.timestamp = timestamp;
        }
    }

    /// Removes the oldest-inserted entry, if any.
    pub fn pop_front(&mut self) -> Option<PriorityEntry> {
        self.by_account.shift_remove_index(0).map(|(_, v)| v)
    }

    /// Insertion-order iteration, used both for eviction and for scanning
    /// candidates in `next_priority`.
    pub fn iter(&self) -> impl Iterator<Item = &PriorityEntry> {
        self.by_account.values()
    }

    pub fn clone_entries(&self) -> Vec<PriorityEntry> {
        self.by_account.values().cloned().collect()
    }
}
