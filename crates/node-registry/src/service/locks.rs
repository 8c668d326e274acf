//! # Per-Key Locks
//!
//! Serializes read-modify-write cycles on the same node id. The ledger has
//! no compare-and-swap, so two unserialized writers on one id would each
//! persist a version missing the other's change.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Lazily created mutex per key. Entries are dropped once uncontended.
#[derive(Default)]
pub struct KeyLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `key`.
    pub fn with_lock<R>(&self, key: &str, f: impl FnOnce() -> R) -> R {
        let entry = {
            let mut locks = self.locks.lock();
            locks.entry(key.to_string()).or_default().clone()
        };

        let result = {
            let _guard = entry.lock();
            f()
        };

        // Waiters clone the entry under the map lock. Our clone is released
        // under it too, so a count of 1 (the map's) means nobody else wants it.
        let mut locks = self.locks.lock();
        drop(entry);
        if locks
            .get(key)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(key);
        }
        result
    }

    /// Number of keys currently tracked.
    pub fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_entries_released_after_use() {
        let locks = KeyLocks::new();
        let value = locks.with_lock("u1", || 42);

        assert_eq!(value, 42);
        assert_eq!(locks.tracked(), 0);
    }

    #[test]
    fn test_entry_released_after_handoff_to_waiter() {
        let locks = Arc::new(KeyLocks::new());
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let holder = {
            let locks = locks.clone();
            thread::spawn(move || {
                locks.with_lock("u1", || {
                    entered_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                })
            })
        };
        entered_rx.recv().unwrap();

        let waiter = {
            let locks = locks.clone();
            thread::spawn(move || locks.with_lock("u1", || 7))
        };
        // Give the waiter time to queue on the held entry
        thread::sleep(Duration::from_millis(20));
        assert_eq!(locks.tracked(), 1);

        release_tx.send(()).unwrap();
        holder.join().unwrap();
        assert_eq!(waiter.join().unwrap(), 7);
        assert_eq!(locks.tracked(), 0);
    }

    #[test]
    fn test_distinct_keys_leave_no_entries() {
        let locks = Arc::new(KeyLocks::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let locks = locks.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        let key = format!("node-{}", (t + i) % 5);
                        locks.with_lock(&key, thread::yield_now);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(locks.tracked(), 0);
    }

    #[test]
    fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = locks.clone();
                let inside = inside.clone();
                let max_inside = max_inside.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        locks.with_lock("u1", || {
                            let n = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_inside.fetch_max(n, Ordering::SeqCst);
                            thread::yield_now();
                            inside.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert_eq!(locks.tracked(), 0);
    }
}
