//! Crossbeam-based reclamation for kvlist.
//!
//! This crate provides `EpochGuard`, an implementation of the `Guard` trait
//! using crossbeam-epoch, and `EpochList`, the read-copy-update list that
//! production code should use.
//!
//! # Usage
//!
//! ```
//! use kvlist_core::KeyValueList;
//! use kvlist_crossbeam::EpochList;
//!
//! let list = EpochList::new();
//! list.push("a", "1").unwrap();
//! list.update("a", "2").unwrap();
//! assert_eq!(list.get("a").unwrap().as_deref(), Some("2"));
//! ```

pub mod epoch_guard;

use kvlist_core::data_structures::RcuList;

pub use epoch_guard::EpochGuard;

/// Read-copy-update list with epoch-based reclamation of replaced nodes.
pub type EpochList = RcuList<EpochGuard>;
