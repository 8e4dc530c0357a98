//! Guard trait for memory reclamation strategies.
//!
//! This module defines the `Guard` trait that abstracts over the deferred
//! reclamation used by the lock-free list: a node replaced by `update` may
//! still be traversed by a concurrent reader, so it is retired to the guard
//! instead of being freed.
//!
//! # Design
//!
//! ```text
//! RcuList<G: Guard>
//!     │
//!     ├── RcuList<EpochGuard>      (production, kvlist-crossbeam)
//!     └── RcuList<DeferredGuard>   (testing)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use kvlist_core::data_structures::{KeyValueList, RcuList};
//! use kvlist_crossbeam::EpochGuard;
//!
//! // Production: epoch-based reclamation
//! let list: RcuList<EpochGuard> = RcuList::new();
//! list.push("a", "1")?;
//!
//! // Testing: retired nodes are kept until teardown
//! let test_list: RcuList<DeferredGuard> = RcuList::new();
//! ```

mod deferred_guard;

pub use deferred_guard::DeferredGuard;

/// A memory reclamation guard that protects concurrent access to nodes.
///
/// - **EpochGuard**: Low overhead, batched reclamation (crossbeam-epoch)
/// - **DeferredGuard**: Simple, defers all destruction until teardown (testing)
///
/// # Safety Contract
///
/// Implementations must ensure:
/// 1. Nodes passed to `defer_destroy` are not freed while a `ReadGuard`
///    pinned before the call is alive
/// 2. After `synchronize` returns, every node passed to `defer_destroy` has
///    been freed, unless the calling thread still holds a `ReadGuard`; then
///    the remaining nodes are freed once that guard is dropped
///
/// # Design Note
///
/// Guards are stored in the list and must be `Send + Sync`. The stored guard
/// schedules deferred destruction. Read protection (pinning) happens
/// per-operation through [`Guard::pin`], not when the guard is created.
///
pub trait Guard: Sized + Default + Send + Sync {
    /// An active guard that protects reads for its lifetime.
    ///
    /// For epoch-based guards, this holds an actual pinned `crossbeam_epoch::Guard`.
    /// For deferred guards, this is `()` since nothing is freed before
    /// teardown.
    ///
    type ReadGuard: Sized;

    /// Pin an active read guard.
    ///
    /// Every node loaded while the returned guard is alive stays allocated
    /// until the guard is dropped.
    ///
    fn pin() -> Self::ReadGuard;

    /// Schedule a node for deferred destruction.
    ///
    /// The node will be deallocated once no reader can still reach it.
    ///
    /// # Safety
    ///
    /// - `node` must be a valid pointer previously allocated by the collection
    /// - `node` must be unlinked from the collection (not reachable by traversal)
    /// - `dealloc` must be the correct deallocation function for `node`
    /// - `node` must not be retired twice
    ///
    unsafe fn defer_destroy<N>(&self, node: *mut N, dealloc: unsafe fn(*mut N));

    /// Number of retired nodes that have not been freed yet.
    ///
    fn pending(&self) -> usize;

    /// Wait until every node retired through this guard has been freed.
    ///
    /// This is the teardown-time grace period: taking `&mut self` means the
    /// owning collection has no operation in flight. A caller that is itself
    /// pinned cannot wait for a grace period; implementations return instead
    /// of blocking.
    ///
    fn synchronize(&mut self);
}
