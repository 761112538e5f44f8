//! Per-name mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Lazily created lock per peer name. Entries are dropped once unused.
#[derive(Debug, Default)]
pub(crate) struct NameLocks {
    table: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl NameLocks {
    /// Run `f` while holding the lock for `name`.
    pub(crate) fn with_name<T>(&self, name: &str, f: impl FnOnce() -> T) -> T {
        let held = Held {
            locks: self,
            name,
            lock: self.acquire(name),
        };
        // Dropped before `held`, so the entry is released unlocked, even
        // when `f` unwinds.
        let _guard = held.lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Run `f` while holding the locks for both names, taken in sorted order.
    pub(crate) fn with_names<T>(&self, a: &str, b: &str, f: impl FnOnce() -> T) -> T {
        if a == b {
            return self.with_name(a, f);
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        self.with_name(first, || self.with_name(second, f))
    }

    fn acquire(&self, name: &str) -> Arc<Mutex<()>> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(table.entry(name.to_string()).or_default())
    }

    fn release(&self, name: &str, lock: &Arc<Mutex<()>>) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // Handles are only cloned under the table lock, so a count of two
        // (table + ours) means nobody else is waiting on this name.
        if Arc::strong_count(lock) == 2 {
            table.remove(name);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// One caller's claim on a name's entry in [`NameLocks`].
struct Held<'a> {
    locks: &'a NameLocks,
    name: &'a str,
    lock: Arc<Mutex<()>>,
}

impl Drop for Held<'_> {
    fn drop(&mut self) {
        self.locks.release(self.name, &self.lock);
    }
}
