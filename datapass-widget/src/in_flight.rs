//! Single-flight guard.
//!
//! Tracks which widget instances are currently updating. Membership checks
//! and changes happen under one mutex; the lock is never held across an
//! await point.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Set of instance ids with an update in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlightSet {
    ids: Arc<Mutex<HashSet<i32>>>,
}

impl InFlightSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically inserts `id`.
    ///
    /// Returns `None` if `id` is already in flight. The id stays in the set
    /// until the returned guard is dropped.
    pub fn try_acquire(&self, id: i32) -> Option<InFlightGuard> {
        if self.lock().insert(id) {
            Some(InFlightGuard {
                set: self.clone(),
                id,
            })
        } else {
            None
        }
    }

    /// Returns true if `id` is in flight.
    pub fn contains(&self, id: i32) -> bool {
        self.lock().contains(&id)
    }

    /// Number of updates in flight.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the set half-modified.
    fn lock(&self) -> MutexGuard<'_, HashSet<i32>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps an id in the [`InFlightSet`] while alive.
#[derive(Debug)]
pub struct InFlightGuard {
    set: InFlightSet,
    id: i32,
}

impl InFlightGuard {
    /// The guarded instance id.
    pub fn id(&self) -> i32 {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.id);
    }
}
