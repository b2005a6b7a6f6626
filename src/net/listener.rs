use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::Notify;

pub type ConnectionId = u64;

/// Per-connection task state. The registry only ever holds a `Weak`
/// reference to this: a connection disappears from the registry on its own,
/// at the next cleanup tick, once its task drops the last strong handle.
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub peer_addr: std::net::SocketAddr,
}

#[derive(Default)]
struct Registry {
    connections: HashMap<ConnectionId, Weak<ConnectionHandle>>,
}

impl Registry {
    fn insert(&mut self, handle: &Arc<ConnectionHandle>) {
        self.connections.insert(handle.id, Arc::downgrade(handle));
    }

    /// Drops every entry whose `Weak` no longer upgrades. Returns how many
    /// were reaped.
    fn cleanup(&mut self) -> usize {
        let before = self.connections.len();
        self.connections.retain(|_, weak| weak.strong_count() > 0);
        before - self.connections.len()
    }

    fn len(&self) -> usize {
        self.connections.len()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ListenerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),
}

/// Boundary TCP acceptor: an accept loop plus a periodic cleanup loop over a
/// weak-handle connection registry, coordinated by an `AtomicBool` flag and
/// a `Notify` for cooperative shutdown. Not part of the tested account-set
/// logic — `on_signal` is the seam a real node would wire to
/// `Engine::priority_up` / `Engine::dependency_update`.
pub struct TcpListenerService {
    registry: Mutex<Registry>,
    next_id: AtomicU64,
    shutdown: AtomicBool,
    notify: Notify,
    cleanup_interval: Duration,
}

impl TcpListenerService {
    pub fn new(cleanup_interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            registry: Mutex::new(Registry::default()),
            next_id: AtomicU64::new(1),
            shutdown: AtomicBool::new(false),
            notify: Notify::new(),
            cleanup_interval,
        })
    }

    pub fn connection_count(&self) -> usize {
        self.registry.lock().len()
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Runs the accept loop. `on_signal` is invoked once per accepted
    /// connection and is expected to be cheap; it is not run under any
    /// engine lock.
    pub async fn run_accept_loop<F>(
        self: &Arc<Self>,
        addr: &str,
        on_signal: F,
    ) -> Result<(), ListenerError>
    where
        F: Fn(Arc<ConnectionHandle>) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ListenerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        log::info!("tcp listener bound on {addr}");

        while !self.is_shutting_down() {
            tokio::select! {
                accepted = listener.accept() => {
                    let (_stream, peer_addr) = accepted.map_err(ListenerError::Accept)?;
                    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                    let handle = Arc::new(ConnectionHandle { id, peer_addr });
                    self.registry.lock().insert(&handle);
                    log::debug!("accepted connection {id} from {peer_addr}");
                    on_signal(handle);
                }
                _ = self.notify.notified() => {
                    break;
                }
            }
        }
        log::info!("tcp listener stopped");
        Ok(())
    }

    /// Runs the cleanup loop: wakes every `cleanup_interval` and reaps dead
    /// registry entries until shutdown.
    pub async fn run_cleanup_loop(self: &Arc<Self>) {
        while !self.is_shutting_down() {
            tokio::select! {
                _ = tokio::time::sleep(self.cleanup_interval) => {
                    let reaped = self.registry.lock().cleanup();
                    if reaped > 0 {
                        log::debug!("cleanup reaped {reaped} dead connection(s)");
                    }
                }
                _ = self.notify.notified() => {
                    break;
                }
            }
        }
    }
}
