//! Read/write access capabilities for the lock-based disciplines.

use std::ops::{Deref, DerefMut};

use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A lock that provides read access and write access to a `T`.
///
/// `LockedList` is written once against this trait; the discipline is picked
/// by the lock type:
///
/// - **`Mutex<T>`**: read access is exclusive, reads and writes never overlap.
/// - **`RwLock<T>`**: read access is shared. `parking_lot`'s lock is
///   task-fair: once a writer is waiting, new readers block behind it, so a
///   steady stream of readers cannot starve writers.
///
pub trait LockDiscipline<T>: Send + Sync {
    /// Access held by readers.
    type ReadAccess<'a>: Deref<Target = T>
    where
        Self: 'a,
        T: 'a;

    /// Access held by writers.
    type WriteAccess<'a>: DerefMut<Target = T>
    where
        Self: 'a,
        T: 'a;

    /// Short name used in logs.
    const NAME: &'static str;

    fn new(value: T) -> Self;

    /// Block until read access is granted.
    fn read(&self) -> Self::ReadAccess<'_>;

    /// Block until write access is granted.
    fn write(&self) -> Self::WriteAccess<'_>;

    /// Direct access for the single owner (no locking).
    fn get_mut(&mut self) -> &mut T;
}

impl<T: Send> LockDiscipline<T> for Mutex<T> {
    type ReadAccess<'a>
        = MutexGuard<'a, T>
    where
        T: 'a;

    type WriteAccess<'a>
        = MutexGuard<'a, T>
    where
        T: 'a;

    const NAME: &'static str = "mutex";

    fn new(value: T) -> Self {
        Mutex::new(value)
    }

    fn read(&self) -> Self::ReadAccess<'_> {
        self.lock()
    }

    fn write(&self) -> Self::WriteAccess<'_> {
        self.lock()
    }

    fn get_mut(&mut self) -> &mut T {
        Mutex::get_mut(self)
    }
}

impl<T: Send + Sync> LockDiscipline<T> for RwLock<T> {
    type ReadAccess<'a>
        = RwLockReadGuard<'a, T>
    where
        T: 'a;

    type WriteAccess<'a>
        = RwLockWriteGuard<'a, T>
    where
        T: 'a;

    const NAME: &'static str = "rwlock";

    fn new(value: T) -> Self {
        RwLock::new(value)
    }

    fn read(&self) -> Self::ReadAccess<'_> {
        RwLock::read(self)
    }

    fn write(&self) -> Self::WriteAccess<'_> {
        RwLock::write(self)
    }

    fn get_mut(&mut self) -> &mut T {
        RwLock::get_mut(self)
    }
}
