use crate::data_structures::Entry;
use crate::error::{ListError, Result};

/// The safe, user-facing API shared by every synchronization discipline.
///
/// # Design Philosophy
///
/// ```text
/// User Code
///    ↓ uses
/// KeyValueList (this trait)        ← push / update / find
///    ↓ implemented by
/// LockedList<Mutex<Chain>>         ← exclusive access for reads and writes
/// LockedList<RwLock<Chain>>        ← shared reads, exclusive writes
/// RcuList<G: Guard>                ← wait-free reads, deferred reclamation
/// ```
///
/// Implementations provide the discipline-specific operations (`push`,
/// `update`, `find_and_apply`, `len`, `entries`). The read helpers (`find`,
/// `get`, `contains`) are built on `find_and_apply`. `find` and `get` verify
/// the checksum of every value they hand out; `contains` hands out no value
/// and only tests presence.
///
/// The list is unordered and keys are not unique: `update` and every read act
/// on the first match scanning from the head, which is the most recently
/// pushed entry for that key.
///
/// # Example
///
/// ```rust
/// use kvlist_core::data_structures::{KeyValueList, MutexList, terminated};
///
/// let list = MutexList::new();
/// list.push("a", "1").unwrap();
/// list.push("b", "2").unwrap();
/// assert!(list.update("a", "99").unwrap());
///
/// let mut buf = [0u8; 8];
/// assert!(list.find("a", &mut buf).unwrap());
/// assert_eq!(terminated(&buf), b"99");
/// assert!(!list.find("c", &mut buf).unwrap());
/// ```
///
pub trait KeyValueList: Send + Sync {
    /// Publish a new entry at the front of the list.
    ///
    /// Fails with `InvalidArgument` if `key` or `value` contains a NUL byte.
    ///
    fn push(&self, key: &str, value: &str) -> Result<()>;

    /// Replace the value of the first entry whose key equals `key`.
    ///
    /// Returns `Ok(false)` and leaves the list unchanged if no entry matches.
    ///
    fn update(&self, key: &str, value: &str) -> Result<bool>;

    /// Find the first entry with `key` and apply `f` to it under read access.
    ///
    /// The entry is handed out as stored; integrity checking is left to the
    /// caller (see [`Entry::verify`]).
    ///
    fn find_and_apply<F, R>(&self, key: &str, f: F) -> Option<R>
    where
        F: FnOnce(&Entry) -> R;

    /// Number of entries in the list.
    ///
    fn len(&self) -> usize;

    /// Snapshot of every `(key, value)` pair, from the head to the tail.
    ///
    fn entries(&self) -> Vec<(String, String)>;

    // ========================================================================
    // Convenience methods
    // ========================================================================

    /// Copy the value of the first entry with `key` into `buf`.
    ///
    /// The value is truncated to `buf.len() - 1` bytes and NUL-terminated.
    /// Returns `Ok(false)` without touching `buf` when no entry matches.
    /// A value that fails its checksum yields `ChecksumMismatch`.
    ///
    fn find(&self, key: &str, buf: &mut [u8]) -> Result<bool> {
        if buf.is_empty() {
            return Err(ListError::invalid_argument(
                "output buffer must hold at least the terminator",
            ));
        }

        match self.find_and_apply(key, |entry| entry.copy_value_into(buf)) {
            Some(copied) => copied.map(|_| true),
            None => Ok(false),
        }
    }

    /// Get a verified, owned copy of the value for `key`.
    ///
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.find_and_apply(key, |entry| {
            entry.verify().map(|()| entry.value().to_owned())
        })
        .transpose()
    }

    /// Check if any entry has `key`.
    ///
    /// No value is read, so no checksum is verified.
    ///
    fn contains(&self, key: &str) -> bool {
        self.find_and_apply(key, |_| ()).is_some()
    }

    /// Check if the list is empty.
    ///
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
