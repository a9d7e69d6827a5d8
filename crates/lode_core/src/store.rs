//! Single-value reactive store
//!
//! A [`Store<T>`] holds one snapshot of `T` and a list of subscribers. Every
//! write replaces the whole snapshot and then notifies subscribers with the
//! new value, so readers never see a partially updated state.
//!
//! Handles are cheap to clone and share the same underlying state. Crates
//! that need a single writer wrap a store and only expose the read half.
//!
//! # Example
//!
//! ```ignore
//! use lode_core::store::Store;
//!
//! let store = Store::new(0u32);
//! let sub = store.subscribe(|v| println!("value is now {v}"));
//! store.set(5);
//! assert_eq!(store.get(), 5);
//! store.unsubscribe(sub);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct StoreInner<T> {
    value: RefCell<T>,
    subscribers: RefCell<FxHashMap<u64, Subscriber<T>>>,
    /// Subscription order, so notification order is deterministic
    order: RefCell<Vec<u64>>,
    next_id: Cell<u64>,
    version: Cell<u64>,
}

/// Shared handle to a single reactive value
pub struct Store<T: Clone + 'static> {
    inner: Rc<StoreInner<T>>,
}

impl<T: Clone + 'static> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Default + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Store<T> {
    /// Create a store holding `initial`
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                value: RefCell::new(initial),
                subscribers: RefCell::new(FxHashMap::default()),
                order: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
                version: Cell::new(0),
            }),
        }
    }

    /// Clone of the current snapshot
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current snapshot without cloning
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Number of writes since creation
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Replace the snapshot and notify subscribers
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.inner.version.set(self.inner.version.get() + 1);
        self.notify();
    }

    /// Build the next snapshot from the current one, then replace it
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.inner.value.borrow());
        self.set(next);
    }

    /// Subscribe to snapshot replacements
    ///
    /// The callback runs after each write with the new snapshot. It may read
    /// the store but must not write to it.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&T) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .insert(id, Rc::new(callback));
        self.inner.order.borrow_mut().push(id);
        SubscriptionHandle { id }
    }

    /// Remove a subscription; returns `false` if it was already removed
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.inner.order.borrow_mut().retain(|id| *id != handle.id);
        self.inner
            .subscribers
            .borrow_mut()
            .remove(&handle.id)
            .is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn notify(&self) {
        // Collect first so callbacks can subscribe/unsubscribe or read the store
        let callbacks: Vec<Subscriber<T>> = {
            let subscribers = self.inner.subscribers.borrow();
            self.inner
                .order
                .borrow()
                .iter()
                .filter_map(|id| subscribers.get(id).cloned())
                .collect()
        };
        let snapshot = self.get();
        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default, Debug, PartialEq)]
    struct TestState {
        count: i32,
        name: String,
    }

    #[test]
    fn test_store_basic() {
        let store = Store::<TestState>::default();
        assert_eq!(store.get(), TestState::default());

        store.set(TestState {
            count: 42,
            name: "hello".into(),
        });

        let state = store.get();
        assert_eq!(state.count, 42);
        assert_eq!(state.name, "hello");
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_store_update() {
        let store = Store::new(TestState::default());
        store.update(|s| TestState {
            count: s.count + 10,
            ..s.clone()
        });
        store.update(|s| TestState {
            count: s.count + 5,
            ..s.clone()
        });
        assert_eq!(store.get().count, 15);
    }

    #[test]
    fn test_clones_share_state() {
        let a = Store::new(1);
        let b = a.clone();
        a.set(7);
        assert_eq!(b.get(), 7);
    }

    #[test]
    fn test_subscriber() {
        let store = Store::new(TestState::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);

        let handle = store.subscribe(move |state: &TestState| {
            seen_clone.borrow_mut().push(state.count);
        });

        store.set(TestState {
            count: 1,
            name: String::new(),
        });
        store.update(|s| TestState {
            count: s.count + 1,
            ..s.clone()
        });
        assert_eq!(*seen.borrow(), vec![1, 2]);

        assert!(store.unsubscribe(handle));
        store.set(TestState::default());
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_can_read_store() {
        let store = Store::new(0);
        let reader = store.clone();
        let observed = Rc::new(Cell::new(-1));
        let observed_clone = Rc::clone(&observed);

        let _handle = store.subscribe(move |v| {
            assert_eq!(*v, reader.get());
            observed_clone.set(*v);
        });

        store.set(3);
        assert_eq!(observed.get(), 3);
    }
}
