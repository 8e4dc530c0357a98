//! Lock-free-read discipline.
//!
//! The list is parameterized by a guard type `G: Guard` that determines
//! the memory reclamation strategy:
//!
//! - `DeferredGuard`: Testing - defers destruction until teardown
//! - `EpochGuard`: Production - epoch-based reclamation (crossbeam-epoch)

pub mod rcu_list;

pub use rcu_list::RcuList;
