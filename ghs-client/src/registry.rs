//! Bookkeeping of open mainframe connections.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Ceiling on concurrently open connections per registry.
pub const MAX_CONNECTIONS: usize = 30;

/// Counts open connections and enforces a ceiling.
///
/// Share one registry (behind an `Arc`) between all connections that should
/// count against the same limit.
#[derive(Debug)]
pub struct ConnectionRegistry {
    open: AtomicUsize,
    limit: usize,
}

impl ConnectionRegistry {
    pub fn new() -> Arc<Self> {
        Self::with_limit(MAX_CONNECTIONS)
    }

    pub fn with_limit(limit: usize) -> Arc<Self> {
        Arc::new(Self {
            open: AtomicUsize::new(0),
            limit,
        })
    }

    /// Reserves a slot if fewer than `limit` connections are open.
    pub fn try_acquire(self: &Arc<Self>) -> Option<RegistrySlot> {
        let reserved = self
            .open
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |open| {
                (open < self.limit).then_some(open + 1)
            })
            .is_ok();

        if reserved {
            Some(RegistrySlot {
                registry: Arc::clone(self),
            })
        } else {
            tracing::debug!("connection limit of {} reached", self.limit);
            None
        }
    }

    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// One reserved connection; releases its slot on drop.
#[derive(Debug)]
pub struct RegistrySlot {
    registry: Arc<ConnectionRegistry>,
}

impl Drop for RegistrySlot {
    fn drop(&mut self) {
        self.registry.open.fetch_sub(1, Ordering::SeqCst);
    }
}
