//! Deferred guard implementation for testing.
//!
//! This module provides `DeferredGuard`, a simple guard implementation that
//! defers all node destruction until the owning list is torn down.

#[cfg(debug_assertions)]
use std::collections::HashSet;

use parking_lot::Mutex;
use tracing::debug;

use super::Guard;

/// A simple guard that defers all node destruction until teardown.
///
/// This is useful for testing where you want predictable destruction timing
/// and an exact count of retired nodes. Not suitable for long-running
/// applications: memory accumulates until the guard is synchronized or
/// dropped.
///
/// # Thread Safety
///
/// `DeferredGuard` uses a `Mutex` internally to collect nodes from multiple
/// threads.
///
pub struct DeferredGuard {
    deferred: Mutex<Vec<DeferredNode>>,
    #[cfg(debug_assertions)]
    seen: Mutex<HashSet<usize>>,
}

struct DeferredNode {
    ptr: *mut (),
    dealloc: unsafe fn(*mut ()),
}

// Safety: DeferredNode is Send because we only store the pointer
// and deallocation function, and ensure proper synchronization via Mutex
unsafe impl Send for DeferredNode {}

impl DeferredGuard {
    /// Create a new deferred guard.
    pub fn new() -> Self {
        DeferredGuard {
            deferred: Mutex::new(Vec::new()),
            #[cfg(debug_assertions)]
            seen: Mutex::new(HashSet::new()),
        }
    }

    fn reclaim(&mut self) -> usize {
        let nodes = std::mem::take(self.deferred.get_mut());
        let reclaimed = nodes.len();

        for node in nodes {
            unsafe {
                (node.dealloc)(node.ptr);
            }
        }

        #[cfg(debug_assertions)]
        self.seen.get_mut().clear();

        reclaimed
    }
}

impl Default for DeferredGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DeferredGuard {
    fn drop(&mut self) {
        let reclaimed = self.reclaim();
        if reclaimed > 0 {
            debug!(reclaimed, "deferred guard dropped with retired nodes");
        }
    }
}

impl Guard for DeferredGuard {
    /// For DeferredGuard, ReadGuard is a no-op since nodes are protected
    /// until the list's stored guard is synchronized.
    type ReadGuard = ();

    fn pin() -> Self::ReadGuard {
        // No-op for DeferredGuard - protection is provided by the stored guard
    }

    unsafe fn defer_destroy<N>(&self, node: *mut N, dealloc: unsafe fn(*mut N)) {
        #[cfg(debug_assertions)]
        {
            let addr = node as usize;
            if !self.seen.lock().insert(addr) {
                panic!("DUPLICATE defer_destroy at {:#x}", addr);
            }
        }

        let node = DeferredNode {
            ptr: node as *mut (),
            dealloc: unsafe {
                std::mem::transmute::<unsafe fn(*mut N), unsafe fn(*mut ())>(dealloc)
            },
        };
        self.deferred.lock().push(node);
    }

    fn pending(&self) -> usize {
        self.deferred.lock().len()
    }

    fn synchronize(&mut self) {
        self.reclaim();
    }
}
