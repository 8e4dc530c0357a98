//! Discipline selection.
//!
//! The discipline can be fixed by type (`MutexList`, `RwLockList`,
//! `RcuList<G>`) or chosen when the list is built from a [`ListConfig`].
//! The facade crate maps a config to a concrete list.

use std::fmt;
use std::str::FromStr;

use crate::error::{ListError, Result};

/// Environment variable read by [`ListConfig::from_env`].
pub const DISCIPLINE_ENV: &str = "KVLIST_DISCIPLINE";

/// Synchronization discipline of a list.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Discipline {
    /// One exclusive lock for reads and writes.
    Mutex,
    /// Shared reads, exclusive writes, waiting writers block new readers.
    RwLock,
    /// Wait-free reads, CAS-published writes, epoch-deferred reclamation.
    #[default]
    Rcu,
}

impl Discipline {
    pub const ALL: [Discipline; 3] = [Discipline::Mutex, Discipline::RwLock, Discipline::Rcu];

    pub fn name(&self) -> &'static str {
        match self {
            Discipline::Mutex => "mutex",
            Discipline::RwLock => "rwlock",
            Discipline::Rcu => "rcu",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Discipline {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mutex" | "exclusive" => Ok(Discipline::Mutex),
            "rwlock" | "rw" | "reader-writer" => Ok(Discipline::RwLock),
            "rcu" | "epoch" | "lock-free" | "lockfree" => Ok(Discipline::Rcu),
            _ => Err(ListError::UnknownDiscipline(s.to_string())),
        }
    }
}

/// Construction-time list configuration.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListConfig {
    pub discipline: Discipline,
}

impl ListConfig {
    pub fn new(discipline: Discipline) -> Self {
        ListConfig { discipline }
    }

    pub fn with_discipline(mut self, discipline: Discipline) -> Self {
        self.discipline = discipline;
        self
    }

    /// Read the discipline from `KVLIST_DISCIPLINE`, defaulting when unset.
    ///
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ListConfig::from_env`], with a caller-provided variable lookup.
    ///
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(DISCIPLINE_ENV) {
            Some(value) if !value.trim().is_empty() => Ok(Self::new(value.parse()?)),
            _ => Ok(Self::default()),
        }
    }
}
