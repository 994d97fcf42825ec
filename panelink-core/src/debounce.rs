//! Keyed one-shot timers
//!
//! A small table checked from the drive tick. Each key has at most one
//! pending entry; scheduling an existing key replaces its payload and
//! restarts its delay. Times are wrapping milliseconds.

use alloc::vec::Vec;

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    payload: V,
    due_ms: u32,
}

/// Pending timers keyed by debounce identity
#[derive(Debug, Clone)]
pub struct DebounceTable<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Default for DebounceTable<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

/// Whether `due_ms` has been reached at `now_ms`, tolerating wrap-around
pub fn is_due(now_ms: u32, due_ms: u32) -> bool {
    (now_ms.wrapping_sub(due_ms) as i32) >= 0
}

impl<K: PartialEq, V> DebounceTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `key` to fire `delay_ms` from `now_ms`
    ///
    /// Returns `true` if an entry for `key` was replaced.
    pub fn schedule(&mut self, key: K, payload: V, now_ms: u32, delay_ms: u32) -> bool {
        let due_ms = now_ms.wrapping_add(delay_ms);
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.payload = payload;
                entry.due_ms = due_ms;
                true
            }
            None => {
                self.entries.push(Entry {
                    key,
                    payload,
                    due_ms,
                });
                false
            }
        }
    }

    /// Disarm `key`, returning its payload
    pub fn cancel(&mut self, key: &K) -> Option<V> {
        let index = self.entries.iter().position(|e| &e.key == key)?;
        Some(self.entries.swap_remove(index).payload)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.entries.iter().any(|e| &e.key == key)
    }

    /// Remove and return the earliest entry that is due
    pub fn take_due(&mut self, now_ms: u32) -> Option<(K, V)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| is_due(now_ms, e.due_ms))
            .max_by_key(|(_, e)| now_ms.wrapping_sub(e.due_ms))
            .map(|(index, _)| index)?;
        let entry = self.entries.swap_remove(index);
        Some((entry.key, entry.payload))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
