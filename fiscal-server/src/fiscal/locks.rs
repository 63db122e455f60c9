//! Per-terminal lock registry
//!
//! One mutual-exclusion handle per terminal identifier, created on
//! first use and kept for the process lifetime. Terminal identifiers
//! are bounded and stable per deployment, so the registry only ever
//! grows by a handful of entries.
//!
//! The registry is owned by the service instance, not a process
//! global, so tests can run isolated instances side by side.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

/// Registry mapping terminal identifiers to their locks
#[derive(Debug, Default)]
pub struct TerminalLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl TerminalLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the lock handle for a terminal, inserting it lazily.
    ///
    /// The shard guard is held only for the lookup/insert; callers
    /// `.lock().await` on the returned handle themselves so the
    /// critical section can span await points.
    pub fn handle(&self, terminal: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(terminal.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Number of terminals seen so far
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
