use serde::Serialize;

use super::clock::Timestamp;
use super::ids::Account;

pub const PRIORITY_INITIAL: f64 = 2.0;
pub const PRIORITY_INCREASE: f64 = 2.0;
pub const PRIORITY_DIVIDE: f64 = 2.0;
pub const PRIORITY_MAX: f64 = 128.0;
pub const PRIORITY_CUTOFF: f64 = 0.15;

/// A single row of the priority set: `{ account, priority, timestamp }`.
/// Stored priorities always satisfy `PRIORITY_CUTOFF < priority <= PRIORITY_MAX`;
/// a `priority_down` that would land at or below the cutoff erases the row
/// instead of storing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityEntry {
    pub account: Account,
    pub priority: f64,
    pub timestamp: Timestamp,
}

impl PriorityEntry {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            priority: PRIORITY_INITIAL,
            timestamp: Timestamp::ZERO,
        }
    }

    /// The sentinel used as `BlockingEntry::original` when an account had no
    /// priority entry at the moment it was blocked.
    pub fn zero_sentinel() -> Self {
        Self {
            account: Account::ZERO,
            priority: 0.0,
            timestamp: Timestamp::ZERO,
        }
    }
}
