//! Subscriber registry and the RAII token that releases a registration.

use std::collections::BTreeMap;
use std::sync::Arc;

pub(crate) type Watcher<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Registered watchers, called in registration order.
pub(crate) struct Subscribers<T> {
    next_id: u64,
    watchers: BTreeMap<u64, Watcher<T>>,
}

impl<T> Subscribers<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            watchers: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, watcher: Watcher<T>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.watchers.insert(id, watcher);
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        self.watchers.remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.watchers.len()
    }

    /// Copies the current watchers so they can be called without holding
    /// the registry lock.
    pub(crate) fn snapshot(&self) -> Vec<Watcher<T>> {
        self.watchers.values().cloned().collect()
    }
}

/// Keeps a watcher registered for as long as it is alive.
///
/// Dropping the token unregisters the watcher. A token outliving its store
/// is harmless.
#[must_use = "dropping a Subscription unregisters its watcher immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Keeps the watcher registered for the rest of the store's life.
    pub fn detach(mut self) {
        self.release = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn drop_runs_release_once() {
        let released = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&released);
        let subscription = Subscription::new(move || flag.store(true, Ordering::SeqCst));
        assert!(!released.load(Ordering::SeqCst));
        drop(subscription);
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn detach_skips_release() {
        let released = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&released);
        Subscription::new(move || flag.store(true, Ordering::SeqCst)).detach();
        assert!(!released.load(Ordering::SeqCst));
    }

    #[test]
    fn registry_snapshot_keeps_insertion_order() {
        let mut subscribers: Subscribers<u32> = Subscribers::new();
        let first = subscribers.insert(Arc::new(|_| {}));
        let second = subscribers.insert(Arc::new(|_| {}));
        assert!(first < second);
        assert_eq!(subscribers.snapshot().len(), 2);
        assert!(subscribers.remove(first));
        assert!(!subscribers.remove(first));
        assert_eq!(subscribers.len(), 1);
    }
}
