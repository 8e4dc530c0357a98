//! Concurrent, in-memory key/value list.
//!
//! The list is an unordered, singly linked chain of `(key, value, checksum)`
//! entries shared between OS threads. Three synchronization disciplines
//! implement the same [`KeyValueList`] trait:
//!
//! | discipline | type | reads | writes |
//! |---|---|---|---|
//! | exclusive | [`MutexList`] | take the mutex | take the mutex |
//! | reader-writer | [`RwLockList`] | share the read lock | take the write lock |
//! | read-copy-update | [`EpochList`] | never block | CAS-publish, epoch-deferred free |
//!
//! Pick one by type, or at runtime through [`ConfiguredList`]:
//!
//! ```
//! use kvlist::{ConfiguredList, Discipline, KeyValueList, ListConfig};
//!
//! let list = ConfiguredList::new(&ListConfig::new(Discipline::RwLock));
//! list.push("a", "1").unwrap();
//! list.push("b", "2").unwrap();
//! list.update("a", "99").unwrap();
//!
//! let mut buf = [0u8; 8];
//! assert!(list.find("a", &mut buf).unwrap());
//! assert_eq!(kvlist::terminated(&buf), b"99");
//! ```

use kvlist_core::data_structures::Entry;
use tracing::debug;

pub use kvlist_core::data_structures::{
    KeyValueList, MutexList, RcuList, RwLockList, checksum, terminated,
};
pub use kvlist_core::guard::Guard;
pub use kvlist_core::{Discipline, ListConfig, ListError, Result};
pub use kvlist_crossbeam::{EpochGuard, EpochList};

/// A list whose discipline is chosen at construction time.
///
#[derive(Debug)]
pub enum ConfiguredList {
    Mutex(MutexList),
    RwLock(RwLockList),
    Rcu(EpochList),
}

macro_rules! dispatch {
    ($self:expr, $list:ident => $body:expr) => {
        match $self {
            ConfiguredList::Mutex($list) => $body,
            ConfiguredList::RwLock($list) => $body,
            ConfiguredList::Rcu($list) => $body,
        }
    };
}

impl ConfiguredList {
    pub fn new(config: &ListConfig) -> Self {
        debug!(discipline = %config.discipline, "configured list selected");
        match config.discipline {
            Discipline::Mutex => ConfiguredList::Mutex(MutexList::new()),
            Discipline::RwLock => ConfiguredList::RwLock(RwLockList::new()),
            Discipline::Rcu => ConfiguredList::Rcu(EpochList::new()),
        }
    }

    /// Build a list from `KVLIST_DISCIPLINE`.
    ///
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(&ListConfig::from_env()?))
    }

    pub fn discipline(&self) -> Discipline {
        match self {
            ConfiguredList::Mutex(_) => Discipline::Mutex,
            ConfiguredList::RwLock(_) => Discipline::RwLock,
            ConfiguredList::Rcu(_) => Discipline::Rcu,
        }
    }
}

impl Default for ConfiguredList {
    fn default() -> Self {
        Self::new(&ListConfig::default())
    }
}

impl KeyValueList for ConfiguredList {
    fn push(&self, key: &str, value: &str) -> Result<()> {
        dispatch!(self, list => list.push(key, value))
    }

    fn update(&self, key: &str, value: &str) -> Result<bool> {
        dispatch!(self, list => list.update(key, value))
    }

    fn find_and_apply<F, R>(&self, key: &str, f: F) -> Option<R>
    where
        F: FnOnce(&Entry) -> R,
    {
        dispatch!(self, list => list.find_and_apply(key, f))
    }

    fn len(&self) -> usize {
        dispatch!(self, list => list.len())
    }

    fn entries(&self) -> Vec<(String, String)> {
        dispatch!(self, list => list.entries())
    }
}
