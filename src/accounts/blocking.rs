use serde::Serialize;

use super::ids::{Account, BlockHash};
use super::priority::PriorityEntry;

/// A single row of the blocking set: the priority entry the account had
/// before it became blocked, the block it is waiting on, and (once known)
/// the account that owns that block.
///
/// `account` is tracked explicitly rather than read off `original.account`:
/// `original` is legitimately the zero-account sentinel when the account
/// had no priority entry at the moment it was blocked (see
/// `PriorityEntry::zero_sentinel`), and that must not be confused with the
/// account this row is actually about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockingEntry {
    pub account: Account,
    pub original: PriorityEntry,
    pub dependency: BlockHash,
    pub dependency_account: Account,
}

impl BlockingEntry {
    pub fn new(account: Account, original: PriorityEntry, dependency: BlockHash) -> Self {
        Self {
            account,
            original,
            dependency,
            dependency_account: Account::ZERO,
        }
    }
}
