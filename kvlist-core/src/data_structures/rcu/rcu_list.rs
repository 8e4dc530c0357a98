use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::data_structures::KeyValueList;
use crate::data_structures::entry::Entry;
use crate::error::Result;
use crate::guard::Guard;

type NodePtr = *mut RcuNode;

///
/// Read-copy-update key/value list.
///
/// Readers never block: they pin a read guard and follow `Acquire`-loaded
/// links. Writers never mutate a published node; they publish new nodes with
/// a single pointer CAS and retire replaced nodes to the guard `G`.
///
// =============================================================================
// PUBLISH (push)
// =============================================================================
//
// Before:  head ──────► A ──────► B
//
// Step 1 - Build N, N.next = A (N is private, readers cannot see it):
//              N ──────► A
//
// Step 2 - CAS head from A to N (Release) [PUBLICATION POINT]:
//          head ──► N ──► A ──────► B
//
// A failed CAS means another push won; reload head and retry.
//
// =============================================================================
// REPLACE (update)
// =============================================================================
//
// Before:  head ──► A ──► B ──► C        (B matches the key)
//
// Step 1 - Build B' with the new value, B'.next = C:
//                         B' ──► C
//
// Step 2 - CAS A.next from B to B' [PUBLICATION POINT]:
//          head ──► A ──► B' ──► C
//                         B  ──► C      (unlinked, still readable)
//
// Step 3 - Retire B to the guard. Readers that loaded B before step 2 keep
//          walking B ──► C safely; B is freed after they unpin.
//
// INVARIANTS:
// 1. A published node's key, value and checksum never change
// 2. Only push writes `head` concurrently with other writers; interior
//    links are written only by the updater holding `update_lock`
// 3. A node's `next` is fixed before the node is published
// 4. Every replaced node is retired exactly once
//
// When the matched node is first, its predecessor link is `head`, so the CAS
// can lose against a concurrent push. The updater then rescans: the new head
// may itself be a better (newer) match.
//
pub struct RcuList<G: Guard> {
    head: AtomicPtr<RcuNode>,
    len: AtomicUsize,
    /// Serializes updaters. Pushes and reads never take it.
    update_lock: Mutex<()>,
    /// Shared guard instance for deferred destruction.
    guard: G,
}

struct RcuNode {
    entry: Entry,
    next: AtomicPtr<RcuNode>,
}

impl RcuNode {
    fn new(entry: Entry) -> Self {
        RcuNode {
            entry,
            next: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// Load next pointer (Acquire ordering)
    #[inline]
    fn get_next(&self) -> NodePtr {
        self.next.load(Ordering::Acquire)
    }

    /// Store next pointer; only valid before the node is published.
    #[inline]
    fn set_next(&self, ptr: NodePtr) {
        self.next.store(ptr, Ordering::Relaxed)
    }

    /// Deallocate this node.
    ///
    /// # Safety
    /// - The pointer must have been allocated by `Box::new` in this module
    /// - Must only be called once
    /// - Node must not be accessed after this call
    ///
    unsafe fn dealloc_ptr(ptr: *mut Self) {
        unsafe { drop(Box::from_raw(ptr)) };
    }
}

impl<G: Guard> RcuList<G> {
    pub fn new() -> Self {
        debug!(discipline = "rcu", "list initialized");
        RcuList {
            head: AtomicPtr::new(ptr::null_mut()),
            len: AtomicUsize::new(0),
            update_lock: Mutex::new(()),
            guard: G::default(),
        }
    }

    /// Get the shared guard instance for this list.
    pub fn guard(&self) -> &G {
        &self.guard
    }

    /// Locate the first node with `key` and the link that points to it.
    ///
    /// # Safety
    /// The caller must keep a read guard pinned while using the result.
    ///
    unsafe fn locate(&self, key: &str) -> Option<(&AtomicPtr<RcuNode>, NodePtr)> {
        let mut link = &self.head;
        let mut curr = link.load(Ordering::Acquire);

        while !curr.is_null() {
            let node = unsafe { &*curr };
            if node.entry.key() == key {
                return Some((link, curr));
            }
            link = &node.next;
            curr = link.load(Ordering::Acquire);
        }

        None
    }
}

impl<G: Guard> KeyValueList for RcuList<G> {
    fn push(&self, key: &str, value: &str) -> Result<()> {
        let new_node = Box::into_raw(Box::new(RcuNode::new(Entry::new(key, value)?)));

        let mut head = self.head.load(Ordering::Acquire);
        loop {
            unsafe {
                (*new_node).set_next(head);
            }

            match self.head.compare_exchange_weak(
                head,
                new_node,
                Ordering::Release,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => head = actual,
            }
        }

        self.len.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn update(&self, key: &str, value: &str) -> Result<bool> {
        let new_node = Box::into_raw(Box::new(RcuNode::new(Entry::new(key, value)?)));

        let _writer = self.update_lock.lock();
        let _read_guard = G::pin();

        loop {
            let Some((link, curr)) = (unsafe { self.locate(key) }) else {
                // Key not found - the replacement was never published.
                //
                unsafe {
                    RcuNode::dealloc_ptr(new_node);
                }
                trace!(key, "update found no matching key");
                return Ok(false);
            };

            unsafe {
                (*new_node).set_next((*curr).get_next());
            }

            if link
                .compare_exchange(curr, new_node, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                // curr is unreachable for new readers; readers already past
                // the link are protected by their pinned guards.
                //
                unsafe {
                    self.guard.defer_destroy(curr, RcuNode::dealloc_ptr);
                }
                return Ok(true);
            }

            // Lost against a push on head, rescan.
        }
    }

    fn find_and_apply<F, R>(&self, key: &str, f: F) -> Option<R>
    where
        F: FnOnce(&Entry) -> R,
    {
        let _read_guard = G::pin();

        let (_, node) = unsafe { self.locate(key) }?;
        Some(f(unsafe { &(*node).entry }))
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    fn entries(&self) -> Vec<(String, String)> {
        let _read_guard = G::pin();

        let mut entries = Vec::new();
        let mut curr = self.head.load(Ordering::Acquire);

        while !curr.is_null() {
            let node = unsafe { &*curr };
            entries.push((node.entry.key().to_owned(), node.entry.value().to_owned()));
            curr = node.get_next();
        }

        entries
    }
}

impl<G: Guard> Default for RcuList<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Guard> Drop for RcuList<G> {
    fn drop(&mut self) {
        // Free the live chain. No reader can be active: we hold the only
        // reference to the list.
        //
        let mut curr = *self.head.get_mut();
        let mut released = 0usize;

        while !curr.is_null() {
            unsafe {
                let next = (*curr).get_next();
                RcuNode::dealloc_ptr(curr);
                curr = next;
            }
            released += 1;
        }

        // Then wait out the grace periods of nodes retired by update.
        //
        let retired = self.guard.pending();
        self.guard.synchronize();

        debug!(discipline = "rcu", released, retired, "list released");
    }
}

impl<G: Guard> std::fmt::Debug for RcuList<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RcuList")
            .field("len", &self.len())
            .field("retired", &self.guard.pending())
            .finish()
    }
}

// ============================================================================
// Tests - Unique to RcuList
// ============================================================================
// Note: Common tests are in tests/list_core_tests.rs
