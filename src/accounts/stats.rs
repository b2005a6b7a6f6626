use std::sync::atomic::{AtomicU64, Ordering};

/// One counter per state transition the account-set engine can take.
/// Monotone and non-resettable: nothing in this module ever decrements
/// or zeroes a counter.
#[derive(Debug, Default)]
pub struct Stats {
    pub prioritize: AtomicU64,
    pub prioritize_failed: AtomicU64,
    pub priority_insert: AtomicU64,

    pub deprioritize: AtomicU64,
    pub deprioritize_failed: AtomicU64,
    pub priority_erase_by_threshold: AtomicU64,

    pub block: AtomicU64,
    pub priority_erase_by_blocking: AtomicU64,
    pub blocking_insert: AtomicU64,

    pub unblock: AtomicU64,
    pub unblock_failed: AtomicU64,

    pub dependency_update: AtomicU64,
    pub dependency_update_failed: AtomicU64,
    pub sync_dependencies: AtomicU64,

    pub priority_erase_overflow: AtomicU64,
    pub blocking_erase_overflow: AtomicU64,
}

/// External stats collaborator contract (infallible, non-blocking).
/// `Stats` below is this crate's own implementation of the sink; an
/// embedding node may plug in a different one (a real metrics exporter).
pub trait StatsSink: Send + Sync {
    fn inc(&self, detail: &str);
}

impl StatsSink for Stats {
    fn inc(&self, detail: &str) {
        let counter = match detail {
            "prioritize" => &self.prioritize,
            "prioritize_failed" => &self.prioritize_failed,
            "priority_insert" => &self.priority_insert,
            "deprioritize" => &self.deprioritize,
            "deprioritize_failed" => &self.deprioritize_failed,
            "priority_erase_by_threshold" => &self.priority_erase_by_threshold,
            "block" => &self.block,
            "priority_erase_by_blocking" => &self.priority_erase_by_blocking,
            "blocking_insert" => &self.blocking_insert,
            "unblock" => &self.unblock,
            "unblock_failed" => &self.unblock_failed,
            "dependency_update" => &self.dependency_update,
            "dependency_update_failed" => &self.dependency_update_failed,
            "sync_dependencies" => &self.sync_dependencies,
            "priority_erase_overflow" => &self.priority_erase_overflow,
            "blocking_erase_overflow" => &self.blocking_erase_overflow,
            other => {
                log::warn!("unknown account-set counter: {other}");
                return;
            }
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Stats {
    pub fn load(&self, detail: &str) -> u64 {
        let counter = match detail {
            "prioritize" => &self.prioritize,
            "prioritize_failed" => &self.prioritize_failed,
            "priority_insert" => &self.priority_insert,
            "deprioritize" => &self.deprioritize,
            "deprioritize_failed" => &self.deprioritize_failed,
            "priority_erase_by_threshold" => &self.priority_erase_by_threshold,
            "block" => &self.block,
            "priority_erase_by_blocking" => &self.priority_erase_by_blocking,
            "blocking_insert" => &self.blocking_insert,
            "unblock" => &self.unblock,
            "unblock_failed" => &self.unblock_failed,
            "dependency_update" => &self.dependency_update,
            "dependency_update_failed" => &self.dependency_update_failed,
            "sync_dependencies" => &self.sync_dependencies,
            "priority_erase_overflow" => &self.priority_erase_overflow,
            "blocking_erase_overflow" => &self.blocking_erase_overflow,
            other => panic!("unknown account-set counter: {other}"),
        };
        counter.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inc_is_monotone() {
        let stats = Stats::default();
        stats.inc("prioritize");
        stats.inc("prioritize");
        assert_eq!(stats.load("prioritize"), 2);
    }

    #[test]
    fn unknown_counter_does_not_panic_on_inc() {
        let stats = Stats::default();
        stats.inc("not_a_real_counter");
    }
}
