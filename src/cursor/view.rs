use std::sync::Arc;

use parking_lot::Mutex;

use super::lens::Lens;
use crate::store::{Reducer, Store, Subscription};

type Getter<M, V> = Arc<dyn Fn(&M) -> V + Send + Sync>;
type Setter<M, V, A> = Arc<dyn Fn(&M, V) -> A + Send + Sync>;

/// A read-only view of part of a store's model.
///
/// Holds no copy of the model: every read derives from the store's current
/// model.
pub struct Reader<R: Reducer, V> {
    store: Store<R>,
    get: Getter<R::Model, V>,
}

impl<R: Reducer, V> Clone for Reader<R, V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            get: Arc::clone(&self.get),
        }
    }
}

impl<R: Reducer, V: 'static> Reader<R, V> {
    pub fn new(store: Store<R>, get: impl Fn(&R::Model) -> V + Send + Sync + 'static) -> Self {
        Self {
            store,
            get: Arc::new(get),
        }
    }

    pub fn get(&self) -> V {
        (self.get)(&*self.store.current())
    }

    /// A reader over a pure projection of this one.
    pub fn map<U: 'static>(&self, f: impl Fn(&V) -> U + Send + Sync + 'static) -> Reader<R, U> {
        let get = Arc::clone(&self.get);
        Reader::new(self.store.clone(), move |model| f(&get(model)))
    }

    pub fn zoom<U: 'static>(&self, lens: Lens<V, U>) -> Reader<R, U> {
        let get = Arc::clone(&self.get);
        Reader::new(self.store.clone(), move |model| lens.get(&get(model)))
    }

    /// Calls `f` with the new value after each change that alters it.
    pub fn watch(&self, f: impl Fn(&V) + Send + Sync + 'static) -> Subscription
    where
        V: Clone + PartialEq + Send,
    {
        let get = Arc::clone(&self.get);
        let last = Mutex::new(self.get());
        self.store.subscribe(move |change| {
            let next = get(&*change.model);
            {
                let mut last = last.lock();
                if *last == next {
                    return;
                }
                *last = next.clone();
            }
            f(&next);
        })
    }

    pub fn store(&self) -> &Store<R> {
        &self.store
    }
}

/// A read/write view: reads like a [`Reader`], writes by dispatching the
/// action its setter builds.
pub struct Cursor<R: Reducer, V> {
    reader: Reader<R, V>,
    set: Setter<R::Model, V, R::Action>,
}

impl<R: Reducer, V> Clone for Cursor<R, V> {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            set: Arc::clone(&self.set),
        }
    }
}

impl<R: Reducer, V: 'static> Cursor<R, V> {
    pub fn new(
        store: Store<R>,
        get: impl Fn(&R::Model) -> V + Send + Sync + 'static,
        set: impl Fn(V) -> R::Action + Send + Sync + 'static,
    ) -> Self {
        Self {
            reader: Reader::new(store, get),
            set: Arc::new(move |_: &R::Model, value: V| set(value)),
        }
    }

    pub fn get(&self) -> V {
        self.reader.get()
    }

    /// Dispatches the action built from `value`.
    ///
    /// The action is built when the store's queue reaches it, so a zoomed
    /// write starts from every write queued before it, even in deferred mode.
    pub fn set(&self, value: V)
    where
        V: Send,
    {
        let set = Arc::clone(&self.set);
        self.reader
            .store
            .dispatch_with(move |model: &R::Model| set(model, value));
    }

    /// Replaces the value with `f` applied to it.
    ///
    /// `f` sees the value the write lands on, so two updates queued in the
    /// same frame compose instead of the second overwriting the first.
    pub fn update(&self, f: impl FnOnce(V) -> V + Send + 'static) {
        let get = Arc::clone(&self.reader.get);
        let set = Arc::clone(&self.set);
        self.reader
            .store
            .dispatch_with(move |model: &R::Model| set(model, f(get(model))));
    }

    /// Narrows the cursor with `lens`.
    ///
    /// The narrowed setter rebuilds the wider value from the model the write
    /// lands on, never from a copy read earlier.
    pub fn zoom<U: 'static>(&self, lens: Lens<V, U>) -> Cursor<R, U> {
        let outer_get = Arc::clone(&self.reader.get);
        let outer_set = Arc::clone(&self.set);
        let focus = lens.clone();
        Cursor {
            reader: self.reader.zoom(lens),
            set: Arc::new(move |model: &R::Model, part: U| {
                let whole = outer_get(model);
                outer_set(model, focus.set(whole, part))
            }),
        }
    }

    pub fn map<U: 'static>(&self, f: impl Fn(&V) -> U + Send + Sync + 'static) -> Reader<R, U> {
        self.reader.map(f)
    }

    pub fn watch(&self, f: impl Fn(&V) + Send + Sync + 'static) -> Subscription
    where
        V: Clone + PartialEq + Send,
    {
        self.reader.watch(f)
    }

    /// Drops the write capability.
    pub fn reader(&self) -> Reader<R, V> {
        self.reader.clone()
    }
}

impl<R: Reducer> Store<R> {
    /// A reader over the whole model.
    pub fn reader(&self) -> Reader<R, R::Model> {
        Reader::new(self.clone(), |model: &R::Model| model.clone())
    }

    pub fn cursor<V: 'static>(
        &self,
        get: impl Fn(&R::Model) -> V + Send + Sync + 'static,
        set: impl Fn(V) -> R::Action + Send + Sync + 'static,
    ) -> Cursor<R, V> {
        Cursor::new(self.clone(), get, set)
    }
}
