//! Lock-based disciplines: one lock guards the whole chain.

pub mod lock_discipline;
pub mod locked_list;

pub use lock_discipline::LockDiscipline;
pub use locked_list::{Chain, LockedList, MutexList, RwLockList};
