use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::data_structures::entry::{Entry, validate};
use crate::data_structures::KeyValueList;
use crate::data_structures::locked::LockDiscipline;
use crate::error::Result;

/// List protected by a single exclusive lock.
pub type MutexList = LockedList<Mutex<Chain>>;

/// List protected by a writer-preferring reader-writer lock.
pub type RwLockList = LockedList<RwLock<Chain>>;

///
/// Singly-linked key/value list guarded by one lock.
///
/// Every write (push, update) takes write access for the whole operation;
/// every read takes read access. Whether reads may overlap is decided by the
/// `L` lock type (see [`LockDiscipline`]).
///
// Layout:
//
//   lock ─► Chain { head ─► [k3,v3] ─► [k2,v2] ─► [k1,v1] ─► None, len: 3 }
//
// push links the new node in front of head. update scans from head and
// replaces the value of the first matching node in place; no node is ever
// unlinked before teardown.
//
pub struct LockedList<L: LockDiscipline<Chain>> {
    chain: L,
}

/// The nodes owned by a [`LockedList`], reachable only through its lock.
///
#[derive(Default)]
pub struct Chain {
    head: Option<Box<LockedNode>>,
    len: usize,
}

struct LockedNode {
    entry: Entry,
    next: Option<Box<LockedNode>>,
}

impl Chain {
    fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            curr: self.head.as_deref(),
        }
    }

    fn find(&self, key: &str) -> Option<&Entry> {
        self.iter().find(|entry| entry.key() == key)
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Entry> {
        let mut curr = self.head.as_deref_mut();

        while let Some(node) = curr {
            if node.entry.key() == key {
                return Some(&mut node.entry);
            }
            curr = node.next.as_deref_mut();
        }

        None
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        // Unlink iteratively; the default recursive drop would overflow the
        // stack on long chains.
        //
        let mut curr = self.head.take();
        while let Some(mut node) = curr {
            curr = node.next.take();
        }
    }
}

struct ChainIter<'a> {
    curr: Option<&'a LockedNode>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.curr?;
        self.curr = node.next.as_deref();
        Some(&node.entry)
    }
}

impl<L: LockDiscipline<Chain>> LockedList<L> {
    pub fn new() -> Self {
        debug!(discipline = L::NAME, "list initialized");
        LockedList {
            chain: L::new(Chain::default()),
        }
    }
}

impl<L: LockDiscipline<Chain>> KeyValueList for LockedList<L> {
    fn push(&self, key: &str, value: &str) -> Result<()> {
        // Allocate outside of the critical section.
        //
        let mut node = Box::new(LockedNode {
            entry: Entry::new(key, value)?,
            next: None,
        });

        let mut chain = self.chain.write();
        node.next = chain.head.take();
        chain.head = Some(node);
        chain.len += 1;

        Ok(())
    }

    fn update(&self, key: &str, value: &str) -> Result<bool> {
        validate("key", key)?;
        validate("value", value)?;

        let value: Box<str> = value.into();

        let previous = {
            let mut chain = self.chain.write();
            chain.find_mut(key).map(|entry| entry.replace_value(value))
        };

        // The previous value is released after write access is given up.
        //
        match previous {
            Some(_) => Ok(true),
            None => {
                trace!(key, "update found no matching key");
                Ok(false)
            }
        }
    }

    fn find_and_apply<F, R>(&self, key: &str, f: F) -> Option<R>
    where
        F: FnOnce(&Entry) -> R,
    {
        let chain = self.chain.read();
        chain.find(key).map(f)
    }

    fn len(&self) -> usize {
        self.chain.read().len
    }

    fn entries(&self) -> Vec<(String, String)> {
        let chain = self.chain.read();
        chain
            .iter()
            .map(|entry| (entry.key().to_owned(), entry.value().to_owned()))
            .collect()
    }
}

impl<L: LockDiscipline<Chain>> Default for LockedList<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LockDiscipline<Chain>> Drop for LockedList<L> {
    fn drop(&mut self) {
        let released = self.chain.get_mut().len;
        debug!(discipline = L::NAME, released, "list released");
    }
}

impl<L: LockDiscipline<Chain>> std::fmt::Debug for LockedList<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockedList")
            .field("discipline", &L::NAME)
            .field("len", &self.len())
            .finish()
    }
}

// ============================================================================
// Tests - Unique to LockedList
// ============================================================================
// Note: Common tests are in tests/list_core_tests.rs
