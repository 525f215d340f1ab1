use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::types::HandleId;

/// Open handles and the state attached to each of them.
///
/// Handle values come from a monotonically increasing counter and are never reused, so a
/// released handle can not be confused with a later open.
pub struct HandleTable<V> {
    next_handle: AtomicU64,
    open: Mutex<HashMap<u64, V>>,
}

impl<V> HandleTable<V> {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            open: Mutex::new(HashMap::new()),
        }
    }

    pub fn open(&self, value: V) -> HandleId {
        let raw = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.open.lock().insert(raw, value);
        HandleId::from(raw)
    }

    /// Removes the handle. `None` when it was never opened or is already released.
    pub fn release(&self, handle: HandleId) -> Option<V> {
        self.open.lock().remove(&handle.as_raw())
    }

    pub fn is_open(&self, handle: HandleId) -> bool {
        self.open.lock().contains_key(&handle.as_raw())
    }

    pub fn open_count(&self) -> usize {
        self.open.lock().len()
    }
}

impl<V: Clone> HandleTable<V> {
    pub fn get(&self, handle: HandleId) -> Option<V> {
        self.open.lock().get(&handle.as_raw()).cloned()
    }
}

impl<V> Default for HandleTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_mints_distinct_handles() {
        let table = HandleTable::new();
        let first = table.open("dir");
        let second = table.open("dir");
        assert_ne!(first, second);
        assert_eq!(table.get(first), Some("dir"));
        assert_eq!(table.open_count(), 2);
    }

    #[test]
    fn test_release_is_linear() {
        let table = HandleTable::new();
        let handle = table.open(7u32);
        assert!(table.is_open(handle));
        assert_eq!(table.release(handle), Some(7));
        assert!(!table.is_open(handle));
        assert_eq!(table.release(handle), None);
        assert_eq!(table.release(HandleId::from(999)), None);
    }

    #[test]
    fn test_handles_are_not_reused() {
        let table = HandleTable::new();
        let first = table.open(());
        table.release(first);
        let second = table.open(());
        assert_ne!(first, second);
    }
}
