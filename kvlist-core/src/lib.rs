//! Concurrent, in-memory key/value list with three synchronization
//! disciplines: exclusive lock, reader-writer lock and read-copy-update.

pub mod common_tests;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod guard;
pub mod preemptive_synchronization;

pub use config::{Discipline, ListConfig};
pub use data_structures::{KeyValueList, MutexList, RcuList, RwLockList};
pub use error::{ListError, Result};
pub use guard::{DeferredGuard, Guard};
