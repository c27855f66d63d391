//! Ledger — append-only audit log of every permission decision.
//!
//! Newest-first, bounded ring (default 100 entries). Every append
//! synchronously invokes each subscriber with the full current snapshot —
//! that snapshot is the whole panel-refresh contract, so subscribers are
//! expected to be cheap.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::types::LogEntry;

/// A ledger subscriber. Invoked with the full newest-first snapshot on every
/// append, not a delta.
pub type LedgerSubscriberFn = Arc<dyn Fn(&[LogEntry]) + Send + Sync>;

struct Subscription {
    id: String,
    callback: LedgerSubscriberFn,
}

pub struct Ledger {
    /// Newest-first entries, truncated to `capacity` after each append.
    entries: RwLock<Vec<LogEntry>>,
    subscriptions: RwLock<Vec<Subscription>>,
    capacity: usize,
    total_appended: AtomicU64,
    total_dropped: AtomicU64,
}

impl Ledger {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::with_capacity(capacity.min(128))),
            subscriptions: RwLock::new(Vec::new()),
            capacity,
            total_appended: AtomicU64::new(0),
            total_dropped: AtomicU64::new(0),
        }
    }

    /// Append a decision record. Always succeeds; oldest entries drop
    /// silently once the bound is exceeded.
    pub fn append(&self, entry: LogEntry) {
        self.total_appended.fetch_add(1, Ordering::Relaxed);
        debug!(
            request_id = %entry.request_id,
            app = %entry.app_name,
            permission = %entry.permission,
            status = ?entry.status,
            "Ledger append"
        );

        let snapshot = {
            let mut entries = self.entries.write();
            entries.insert(0, entry);
            if entries.len() > self.capacity {
                let dropped = entries.len() - self.capacity;
                entries.truncate(self.capacity);
                self.total_dropped.fetch_add(dropped as u64, Ordering::Relaxed);
            }
            entries.clone()
        };

        // Notify outside both locks so a callback can read back or
        // subscribe/unsubscribe without deadlocking.
        let callbacks: Vec<LedgerSubscriberFn> = {
            let subs = self.subscriptions.read();
            subs.iter().map(|s| s.callback.clone()).collect()
        };
        for callback in callbacks {
            callback(&snapshot);
        }
    }

    /// Full snapshot, newest-first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    /// Register a subscriber under a caller-chosen id. A second subscription
    /// with the same id replaces the first.
    pub fn subscribe(&self, id: &str, callback: LedgerSubscriberFn) {
        let mut subs = self.subscriptions.write();
        subs.retain(|s| s.id != id);
        subs.push(Subscription { id: id.into(), callback });
    }

    /// Remove a subscriber. Unknown ids are a no-op.
    pub fn unsubscribe(&self, id: &str) -> bool {
        let mut subs = self.subscriptions.write();
        let before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() < before
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    pub fn total_appended(&self) -> u64 {
        self.total_appended.load(Ordering::Relaxed)
    }

    pub fn total_dropped(&self) -> u64 {
        self.total_dropped.load(Ordering::Relaxed)
    }
}
