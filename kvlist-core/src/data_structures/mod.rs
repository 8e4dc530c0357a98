//! Concurrent key/value lists.
//!
//! # Organization
//!
//! - [`checksum`] - Value integrity tag
//! - [`entry`] - Key/value payload shared by every node type
//! - [`locked`] - Mutex and reader-writer lock disciplines
//! - [`rcu`] - Lock-free-read discipline with deferred reclamation

pub mod checksum;
pub mod entry;
pub mod key_value_list;
pub mod locked;
pub mod rcu;

pub use checksum::checksum;
pub use entry::{Entry, terminated};
pub use key_value_list::KeyValueList;
pub use locked::{LockDiscipline, LockedList, MutexList, RwLockList};
pub use rcu::RcuList;
