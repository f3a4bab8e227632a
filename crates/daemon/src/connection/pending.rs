// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-connection pending-request table: tracks requests the worker
//! pool has accepted but not yet completed, so responses can be matched by
//! id in any order and so disconnection can cancel outstanding work
//! cooperatively.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use voxel_wire::Id;

pub struct PendingEntry {
    pub dispatched_at: Instant,
    pub cancel_flag: Arc<AtomicBool>,
}

#[derive(Default)]
pub struct PendingTable {
    entries: HashMap<Id, PendingEntry>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers a dispatched request and returns the cancel flag the
    /// worker must consult before and after running the op.
    pub fn insert(&mut self, id: Id) -> Arc<AtomicBool> {
        let cancel_flag = Arc::new(AtomicBool::new(false));
        self.entries.insert(id, PendingEntry { dispatched_at: Instant::now(), cancel_flag: Arc::clone(&cancel_flag) });
        cancel_flag
    }

    /// Removes the entry for a completed (or abandoned) request.
    pub fn remove(&mut self, id: &Id) {
        self.entries.remove(id);
    }

    /// Sets the cancel flag on every outstanding entry, e.g. when the
    /// connection is entering Draining. Workers still mid-flight may
    /// finish their op but will discard the result.
    pub fn cancel_all(&self) {
        for entry in self.entries.values() {
            entry.cancel_flag.store(true, Ordering::Release);
        }
    }

    pub fn oldest_dispatched_at(&self) -> Option<Instant> {
        self.entries.values().map(|e| e.dispatched_at).min()
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
