use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::clock::{Clock, SystemClock};
use super::ids::{Account, BlockHash};
use super::sets::{AccountSets, AccountSetsConfig, AccountSetsInfo, ContainerInfo};
use super::stats::{Stats, StatsSink};

/// Engine-level configuration: the hard caps from `AccountSetsConfig` plus
/// the sampler's cooldown (§6.1).
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub priorities_max: usize,
    pub blocking_max: usize,
    pub cooldown: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            priorities_max: 4096,
            blocking_max: 4096,
            cooldown: Duration::from_secs(3),
        }
    }
}

impl From<EngineConfig> for AccountSetsConfig {
    fn from(c: EngineConfig) -> Self {
        AccountSetsConfig {
            priorities_max: c.priorities_max,
            blocking_max: c.blocking_max,
        }
    }
}

/// The account-set engine as seen by producers and consumers: a single
/// `parking_lot::Mutex` serializes every public call for its whole
/// duration (§5). No method here suspends or performs I/O while holding
/// the lock, so tail latency is bounded by the size caps alone.
pub struct Engine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    stats: Arc<Stats>,
    inner: Mutex<AccountSets>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let stats = Arc::new(Stats::default());
        let inner = AccountSets::new(config.into(), stats.clone() as Arc<dyn StatsSink>);
        Self {
            config,
            clock,
            stats,
            inner: Mutex::new(inner),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn priority_up(&self, account: Account) {
        self.inner.lock().priority_up(account);
    }

    pub fn priority_down(&self, account: Account) {
        self.inner.lock().priority_down(account);
    }

    pub fn priority_set(&self, account: Account) {
        self.inner.lock().priority_set(account);
    }

    pub fn block(&self, account: Account, dependency: BlockHash) {
        self.inner.lock().block(account, dependency);
    }

    pub fn unblock(&self, account: Account, hash: Option<BlockHash>) {
        self.inner.lock().unblock(account, hash);
    }

    pub fn dependency_update(&self, hash: BlockHash, dependency_account: Account) {
        self.inner.lock().dependency_update(hash, dependency_account);
    }

    pub fn sync_dependencies(&self) {
        self.inner.lock().sync_dependencies();
    }

    pub fn blocked(&self, account: Account) -> bool {
        self.inner.lock().blocked(account)
    }

    pub fn prioritized(&self, account: Account) -> bool {
        self.inner.lock().prioritized(account)
    }

    pub fn priority(&self, account: Account) -> f64 {
        self.inner.lock().priority(account)
    }

    pub fn priority_size(&self) -> usize {
        self.inner.lock().priority_size()
    }

    pub fn blocked_size(&self) -> usize {
        self.inner.lock().blocked_size()
    }

    pub fn priority_half_full(&self) -> bool {
        self.inner.lock().priority_half_full()
    }

    pub fn blocked_half_full(&self) -> bool {
        self.inner.lock().blocked_half_full()
    }

    pub fn info(&self) -> AccountSetsInfo {
        self.inner.lock().info()
    }

    pub fn container_info(&self) -> ContainerInfo {
        self.inner.lock().container_info()
    }

    /// Sampler entry point (§4.4). `filter` runs under the engine's lock —
    /// it must be cheap and must not call back into the engine.
    pub fn next_priority<F>(&self, filter: F) -> Account
    where
        F: FnMut(Account) -> bool,
    {
        let now = self.clock.now();
        self.inner.lock().next_priority(now, self.config.cooldown, filter)
    }

    pub fn next_blocking<F>(&self, filter: F) -> BlockHash
    where
        F: FnMut(BlockHash) -> bool,
    {
        self.inner.lock().next_blocking(filter)
    }

    pub fn timestamp_set(&self, account: Account) {
        let now = self.clock.now();
        self.inner.lock().timestamp_set(account, now);
    }

    pub fn timestamp_reset(&self, account: Account) {
        self.inner.lock().timestamp_reset(account);
    }
}
