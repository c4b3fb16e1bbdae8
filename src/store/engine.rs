//! The store: single owner of the current model.

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use anyhow::anyhow;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use super::action::ActionRecord;
use super::deps::Deps;
use super::reducer::{try_reduce, Reducer, Transition};
use super::subscription::{Subscribers, Subscription};
use crate::effect::{Body, CancelToken, Context, Dispatcher, Effect, EffectResult};
use crate::error::{panic_message, EffectFailure};
use crate::history::{History, Seek};

/// Default number of history entries kept by a store.
pub const DEFAULT_HISTORY_ENTRIES: usize = 512;

/// When queued operations are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// The dispatching thread drains the queue before returning, unless
    /// another thread is already draining it.
    #[default]
    Immediate,
    /// Dispatch only enqueues. The owner calls [`Store::drain`], typically
    /// once per frame.
    Deferred,
}

/// Why the current model changed.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeCause<A> {
    Action(A),
    Undo,
    Redo,
    Jump(u64),
}

/// A committed transition, delivered to subscribers.
#[derive(Debug, Clone)]
pub struct Change<M, A> {
    pub model: Arc<M>,
    pub cause: ChangeCause<A>,
    /// Store-wide commit counter, starting at 1 for the first change.
    pub revision: u64,
}

type Derive<M, A> = Box<dyn FnOnce(&M) -> A + Send>;

enum Op<M, A> {
    Action(A),
    /// Builds its action from the model current when the op is processed.
    Derive(Derive<M, A>),
    Undo,
    Redo,
    Goto(u64),
}

type HistoryOf<R> = History<<R as Reducer>::Model, <R as Reducer>::Action>;
type ChangeOf<R> = Change<<R as Reducer>::Model, <R as Reducer>::Action>;

struct Inner<R: Reducer> {
    current: RwLock<Arc<R::Model>>,
    queue: Mutex<VecDeque<Op<R::Model, R::Action>>>,
    // Held by whichever thread is running reducers. Never waited on.
    drain_lock: Mutex<()>,
    history: RwLock<Option<HistoryOf<R>>>,
    subscribers: Mutex<Subscribers<ChangeOf<R>>>,
    revision: AtomicU64,
    mode: DispatchMode,
    runtime: Option<Handle>,
    deps: Arc<Deps>,
    _reducer: PhantomData<fn() -> R>,
}

/// Owns the current model and serializes every transition through `R`.
///
/// Cloning a `Store` yields another handle to the same store.
pub struct Store<R: Reducer> {
    inner: Arc<Inner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Reducer> Store<R> {
    /// A store with default options: immediate dispatch, history enabled.
    pub fn new(initial: R::Model) -> Self {
        Self::builder().build(initial)
    }

    pub fn builder() -> StoreBuilder<R> {
        StoreBuilder::new()
    }

    /// The current model. Cheap: clones an `Arc`.
    pub fn current(&self) -> Arc<R::Model> {
        Arc::clone(&*self.inner.current.read())
    }

    /// Enqueues `action`. In immediate mode the queue is drained before
    /// returning.
    pub fn dispatch(&self, action: R::Action) {
        self.inner.enqueue(Op::Action(action));
    }

    /// Enqueues an action built by `f` from the model current when the queue
    /// reaches it, after every operation queued before it has committed.
    ///
    /// Use this when the action depends on state: in deferred mode a value
    /// read at dispatch time may be stale by the time the action commits.
    pub fn dispatch_with(&self, f: impl FnOnce(&R::Model) -> R::Action + Send + 'static) {
        self.inner.enqueue(Op::Derive(Box::new(f)));
    }

    /// Dispatches a logged action record.
    ///
    /// Returns `false` without touching the store when the record's tag is
    /// not recognized.
    pub fn dispatch_record(&self, record: &ActionRecord) -> bool
    where
        R::Action: DeserializeOwned,
    {
        match record.decode::<R::Action>() {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    pub fn undo(&self) {
        self.inner.enqueue(Op::Undo);
    }

    pub fn redo(&self) {
        self.inner.enqueue(Op::Redo);
    }

    /// Jumps to the history entry with `sequence`.
    pub fn goto(&self, sequence: u64) {
        self.inner.enqueue(Op::Goto(sequence));
    }

    /// Processes queued operations. Returns how many were processed by this
    /// call; zero if another thread is already draining.
    pub fn drain(&self) -> usize {
        self.inner.drain()
    }

    pub fn pending(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Registers `watcher` to run after every committed change.
    ///
    /// Watchers run on the draining thread, after the new model is current
    /// and before that transition's effects start.
    pub fn subscribe(&self, watcher: impl Fn(&ChangeOf<R>) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.subscribers.lock().insert(Arc::new(watcher));
        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.lock().remove(id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    /// A snapshot of the history. Later transitions do not affect it.
    pub fn history(&self) -> Option<HistoryOf<R>> {
        self.inner.history.read().clone()
    }

    /// A capability that enqueues into this store without keeping it alive.
    pub fn dispatcher(&self) -> Dispatcher<R::Action> {
        Inner::dispatcher(&self.inner)
    }

    pub fn mode(&self) -> DispatchMode {
        self.inner.mode
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::SeqCst)
    }

    pub fn deps(&self) -> &Arc<Deps> {
        &self.inner.deps
    }
}

impl<R: Reducer> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("reducer", &std::any::type_name::<R>())
            .field("mode", &self.inner.mode)
            .field("revision", &self.revision())
            .field("pending", &self.pending())
            .finish()
    }
}

impl<R: Reducer> Inner<R> {
    fn dispatcher(this: &Arc<Self>) -> Dispatcher<R::Action> {
        let weak: Weak<Self> = Arc::downgrade(this);
        Dispatcher::new(move |action| match weak.upgrade() {
            Some(inner) => {
                inner.enqueue(Op::Action(action));
                true
            }
            None => {
                tracing::warn!(?action, "store dropped, discarding dispatch");
                false
            }
        })
    }

    fn enqueue(self: &Arc<Self>, op: Op<R::Model, R::Action>) {
        let pending = {
            let mut queue = self.queue.lock();
            queue.push_back(op);
            queue.len()
        };
        tracing::trace!(pending, "operation enqueued");
        if self.mode == DispatchMode::Immediate {
            self.drain();
        }
    }

    fn next_op(&self) -> Option<Op<R::Model, R::Action>> {
        self.queue.lock().pop_front()
    }

    fn drain(self: &Arc<Self>) -> usize {
        let mut processed = 0;
        loop {
            let Some(guard) = self.drain_lock.try_lock() else {
                return processed;
            };
            while let Some(op) = self.next_op() {
                self.apply(op);
                processed += 1;
            }
            drop(guard);
            // An enqueue that lost the try_lock race after our last pop
            // relies on us to pick it up.
            if self.queue.lock().is_empty() {
                return processed;
            }
        }
    }

    fn apply(self: &Arc<Self>, op: Op<R::Model, R::Action>) {
        match op {
            Op::Action(action) => self.commit(action),
            Op::Derive(derive) => {
                let current = Arc::clone(&*self.current.read());
                self.commit(derive(&current));
            }
            Op::Undo => self.travel(ChangeCause::Undo, |history| history.undo()),
            Op::Redo => self.travel(ChangeCause::Redo, |history| history.redo()),
            Op::Goto(sequence) => {
                self.travel(ChangeCause::Jump(sequence), |history| history.goto(sequence))
            }
        }
    }

    fn commit(self: &Arc<Self>, action: R::Action) {
        let previous = Arc::clone(&*self.current.read());
        let Transition { model, effects } = match try_reduce::<R>((*previous).clone(), action.clone()) {
            Ok(transition) => transition,
            Err(payload) => {
                tracing::error!(
                    reducer = std::any::type_name::<R>(),
                    ?action,
                    message = %panic_message(payload.as_ref()),
                    "reducer contract violation"
                );
                std::panic::resume_unwind(payload);
            }
        };

        // An unchanged model keeps its identity and is not an undo step.
        let changed = model != *previous;
        let model = if changed { Arc::new(model) } else { previous };
        *self.current.write() = Arc::clone(&model);

        if changed && R::records(&action) {
            if let Some(history) = self.history.write().as_mut() {
                history.record(Arc::clone(&model), Some(action.clone()));
            }
        }

        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(revision, changed, effects = effects.len(), ?action, "committed");
        self.notify(&Change {
            model,
            cause: ChangeCause::Action(action),
            revision,
        });
        self.run_effects(effects);
    }

    fn travel(
        self: &Arc<Self>,
        cause: ChangeCause<R::Action>,
        seek: impl FnOnce(&mut HistoryOf<R>) -> Seek<R::Model>,
    ) {
        let result = match self.history.write().as_mut() {
            Some(history) => seek(history),
            None => Seek::AtBoundary,
        };
        match result {
            Seek::AtBoundary => tracing::debug!(?cause, "history boundary"),
            Seek::Moved { sequence, model } => {
                *self.current.write() = Arc::clone(&model);
                let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::debug!(revision, sequence, ?cause, "moved through history");
                let effects = R::on_travel(&model);
                self.notify(&Change {
                    model,
                    cause,
                    revision,
                });
                self.run_effects(effects);
            }
        }
    }

    fn notify(&self, change: &ChangeOf<R>) {
        let watchers = self.subscribers.lock().snapshot();
        for watcher in watchers {
            watcher(change);
        }
    }

    fn run_effects(self: &Arc<Self>, effects: Vec<Effect<R::Action>>) {
        for effect in effects {
            let (label, body, cancel) = effect.into_parts();
            if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                tracing::debug!(effect = %label, "skipping cancelled effect");
                continue;
            }
            let ctx = Context::new(Inner::dispatcher(self), Arc::clone(&self.deps), cancel.clone());

            match body {
                Body::Dispatch(actions) => {
                    for action in actions {
                        ctx.dispatch(action);
                    }
                }
                Body::Run(run) => {
                    let result = run(&ctx);
                    self.settle(&label, result, cancel.as_ref());
                }
                Body::Task(task) => {
                    let Some(runtime) = &self.runtime else {
                        self.settle(&label, Err(anyhow!("no async runtime for task effects")), cancel.as_ref());
                        continue;
                    };
                    let weak = Arc::downgrade(self);
                    runtime.spawn(async move {
                        let future = task(ctx);
                        let result = match &cancel {
                            Some(token) => tokio::select! {
                                result = future => result,
                                _ = token.cancelled() => {
                                    tracing::debug!(effect = %label, "task effect cancelled");
                                    return;
                                }
                            },
                            None => future.await,
                        };
                        if let Some(inner) = weak.upgrade() {
                            inner.settle(&label, result, cancel.as_ref());
                        }
                    });
                }
                Body::Delay { after, action } => {
                    let Some(runtime) = &self.runtime else {
                        self.settle(&label, Err(anyhow!("no async runtime for delayed effects")), cancel.as_ref());
                        continue;
                    };
                    runtime.spawn(delayed_dispatch(ctx, after, action));
                }
            }
        }
    }

    fn settle(self: &Arc<Self>, label: &str, result: EffectResult, cancel: Option<&CancelToken>) {
        let Err(error) = result else {
            return;
        };
        if cancel.is_some_and(CancelToken::is_cancelled) {
            tracing::debug!(effect = label, %error, "ignoring failure of cancelled effect");
            return;
        }
        tracing::error!(effect = label, error = %format!("{error:#}"), "effect failed");
        let failure = EffectFailure {
            effect: label.to_string(),
            message: format!("{error:#}"),
        };
        if let Some(action) = R::effect_failed(failure) {
            self.enqueue(Op::Action(action));
        }
    }
}

async fn delayed_dispatch<A: 'static>(ctx: Context<A>, after: Duration, action: A) {
    match ctx.cancel_token() {
        Some(token) => {
            tokio::select! {
                _ = tokio::time::sleep(after) => {}
                _ = token.cancelled() => return,
            }
        }
        None => tokio::time::sleep(after).await,
    }
    ctx.dispatch(action);
}

/// Configures and creates a [`Store`].
pub struct StoreBuilder<R: Reducer> {
    mode: DispatchMode,
    history: Option<usize>,
    seeded: Option<HistoryOf<R>>,
    runtime: Option<Handle>,
    deps: Deps,
}

impl<R: Reducer> StoreBuilder<R> {
    pub fn new() -> Self {
        Self {
            mode: DispatchMode::default(),
            history: Some(DEFAULT_HISTORY_ENTRIES),
            seeded: None,
            runtime: None,
            deps: Deps::new(),
        }
    }

    pub fn mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Keeps up to `max_entries` history entries; `None` disables history.
    pub fn history(mut self, max_entries: Option<usize>) -> Self {
        self.history = max_entries;
        self
    }

    /// Resumes from a previously saved history. The store starts at the
    /// history's current entry.
    pub fn resume(mut self, history: HistoryOf<R>) -> Self {
        self.seeded = Some(history);
        self
    }

    /// Runtime used for task and delay effects. Defaults to the runtime the
    /// store is built on, if any.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn deps(mut self, deps: Deps) -> Self {
        self.deps = deps;
        self
    }

    pub fn with_dep<T: Send + Sync + 'static>(mut self, service: T) -> Self {
        self.deps = self.deps.with(service);
        self
    }

    /// Builds the store. `initial` is ignored when resuming a history.
    pub fn build(self, initial: R::Model) -> Store<R> {
        let (current, history) = match (self.seeded, self.history) {
            (Some(history), Some(_)) => (Arc::clone(&history.current().model), Some(history)),
            (Some(history), None) => (Arc::clone(&history.current().model), None),
            (None, Some(max_entries)) => {
                let initial = Arc::new(initial);
                (Arc::clone(&initial), Some(History::new(initial, max_entries)))
            }
            (None, None) => (Arc::new(initial), None),
        };
        let runtime = self.runtime.or_else(|| Handle::try_current().ok());
        tracing::debug!(
            reducer = std::any::type_name::<R>(),
            mode = ?self.mode,
            history = history.as_ref().map(History::max_entries),
            runtime = runtime.is_some(),
            "store created"
        );

        Store {
            inner: Arc::new(Inner {
                current: RwLock::new(current),
                queue: Mutex::new(VecDeque::new()),
                drain_lock: Mutex::new(()),
                history: RwLock::new(history),
                subscribers: Mutex::new(Subscribers::new()),
                revision: AtomicU64::new(0),
                mode: self.mode,
                runtime,
                deps: Arc::new(self.deps),
                _reducer: PhantomData,
            }),
        }
    }
}

impl<R: Reducer> Default for StoreBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Action, Model};
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Clone, PartialEq)]
    struct Tally {
        count: i64,
        log: Vec<i64>,
        errors: Vec<String>,
    }

    impl Model for Tally {}

    #[derive(Debug, Clone, PartialEq)]
    enum TallyAction {
        Add(i64),
        AddTwice(i64),
        Peek,
        Tick,
        Explode,
        Fail,
        Failed(String),
    }

    impl Action for TallyAction {}

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type Model = Tally;
        type Action = TallyAction;

        fn reduce(mut model: Tally, action: TallyAction) -> Transition<Tally, TallyAction> {
            match action {
                TallyAction::Add(n) => {
                    model.count += n;
                    model.log.push(n);
                    Transition::new(model)
                }
                TallyAction::AddTwice(n) => Transition::new(model)
                    .with(Effect::dispatch_all("twice", vec![TallyAction::Add(n), TallyAction::Add(n)])),
                TallyAction::Peek => Transition::new(model),
                TallyAction::Tick => {
                    model.count += 1;
                    Transition::new(model)
                }
                TallyAction::Explode => panic!("reducer exploded"),
                TallyAction::Fail => Transition::new(model)
                    .with(Effect::run("always-fails", |_| Err(anyhow!("boom")))),
                TallyAction::Failed(message) => {
                    model.errors.push(message);
                    Transition::new(model)
                }
            }
        }

        fn records(action: &TallyAction) -> bool {
            !matches!(action, TallyAction::Tick)
        }

        fn effect_failed(failure: EffectFailure) -> Option<TallyAction> {
            Some(TallyAction::Failed(failure.message))
        }
    }

    fn tally() -> Tally {
        Tally {
            count: 0,
            log: Vec::new(),
            errors: Vec::new(),
        }
    }

    #[test]
    fn immediate_dispatch_commits_before_returning() {
        let store = Store::<TallyReducer>::new(tally());
        store.dispatch(TallyAction::Add(3));
        store.dispatch(TallyAction::Add(4));
        assert_eq!(store.current().count, 7);
        assert_eq!(store.current().log, vec![3, 4]);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn deferred_dispatch_waits_for_drain() {
        let store = Store::<TallyReducer>::builder()
            .mode(DispatchMode::Deferred)
            .build(tally());
        store.dispatch(TallyAction::Add(1));
        store.dispatch(TallyAction::Add(2));
        assert_eq!(store.current().count, 0);
        assert_eq!(store.pending(), 2);

        assert_eq!(store.drain(), 2);
        assert_eq!(store.current().log, vec![1, 2]);
        assert_eq!(store.pending(), 0);
    }

    #[test]
    fn derived_actions_see_earlier_queued_commits() {
        let store = Store::<TallyReducer>::builder()
            .mode(DispatchMode::Deferred)
            .build(tally());
        store.dispatch(TallyAction::Add(4));
        store.dispatch_with(|model: &Tally| TallyAction::Add(model.count * 10));
        assert_eq!(store.current().count, 0);

        store.drain();
        assert_eq!(store.current().log, vec![4, 40]);
    }

    #[test]
    fn history_moves_run_travel_effects() {
        struct ResyncReducer;
        impl Reducer for ResyncReducer {
            type Model = Tally;
            type Action = TallyAction;

            fn reduce(model: Tally, action: TallyAction) -> Transition<Tally, TallyAction> {
                TallyReducer::reduce(model, action)
            }

            fn on_travel(_model: &Tally) -> Vec<Effect<TallyAction>> {
                vec![Effect::dispatch("resync", TallyAction::Peek)]
            }
        }

        let store = Store::<ResyncReducer>::new(tally());
        let causes = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&causes);
        let _subscription = store.subscribe(move |change| seen.lock().push(change.cause.clone()));

        store.dispatch(TallyAction::Add(1));
        store.undo();
        store.undo();

        assert_eq!(
            *causes.lock(),
            vec![
                ChangeCause::Action(TallyAction::Add(1)),
                ChangeCause::Undo,
                ChangeCause::Action(TallyAction::Peek),
            ]
        );
        // The unchanged resync commit kept the redo tail.
        assert!(store.history().unwrap().can_redo());
    }

    #[test]
    fn dispatch_effects_run_in_order_after_commit() {
        let store = Store::<TallyReducer>::new(tally());
        store.dispatch(TallyAction::AddTwice(5));
        assert_eq!(store.current().log, vec![5, 5]);
    }

    #[test]
    fn unchanged_model_keeps_identity_and_skips_history() {
        let store = Store::<TallyReducer>::new(tally());
        let before = store.current();
        store.dispatch(TallyAction::Peek);
        assert!(Arc::ptr_eq(&before, &store.current()));
        assert_eq!(store.history().map(|h| h.len()), Some(1));
    }

    #[test]
    fn transient_actions_commit_without_history() {
        let store = Store::<TallyReducer>::new(tally());
        store.dispatch(TallyAction::Tick);
        assert_eq!(store.current().count, 1);
        assert_eq!(store.history().map(|h| h.len()), Some(1));
    }

    #[test]
    fn undo_redo_notify_subscribers() {
        let store = Store::<TallyReducer>::new(tally());
        let causes = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&causes);
        let _subscription = store.subscribe(move |change| seen.lock().push(change.cause.clone()));

        store.dispatch(TallyAction::Add(1));
        store.undo();
        store.undo();
        store.redo();

        assert_eq!(
            *causes.lock(),
            vec![ChangeCause::Action(TallyAction::Add(1)), ChangeCause::Undo, ChangeCause::Redo]
        );
        assert_eq!(store.current().count, 1);
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let store = Store::<TallyReducer>::new(tally());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        store.dispatch(TallyAction::Add(1));
        drop(subscription);
        store.dispatch(TallyAction::Add(1));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn reentrant_dispatch_from_subscriber_is_queued() {
        let store = Store::<TallyReducer>::new(tally());
        let dispatcher = store.dispatcher();
        let _subscription = store.subscribe(move |change| {
            if change.cause == ChangeCause::Action(TallyAction::Add(1)) {
                dispatcher.dispatch(TallyAction::Add(10));
            }
        });
        store.dispatch(TallyAction::Add(1));
        store.dispatch(TallyAction::Add(100));
        assert_eq!(store.current().log, vec![1, 10, 100]);
    }

    #[test]
    fn sync_effect_failure_becomes_an_action() {
        let store = Store::<TallyReducer>::new(tally());
        store.dispatch(TallyAction::Fail);
        assert_eq!(store.current().errors, vec!["boom".to_string()]);
    }

    #[test]
    fn task_effect_without_runtime_fails_into_an_action() {
        struct TaskReducer;
        impl Reducer for TaskReducer {
            type Model = Tally;
            type Action = TallyAction;

            fn reduce(model: Tally, action: TallyAction) -> Transition<Tally, TallyAction> {
                match action {
                    TallyAction::Peek => Transition::new(model)
                        .with(Effect::task("needs-runtime", |_| async { Ok(()) })),
                    other => TallyReducer::reduce(model, other),
                }
            }

            fn effect_failed(failure: EffectFailure) -> Option<TallyAction> {
                Some(TallyAction::Failed(failure.effect))
            }
        }

        let store = Store::<TaskReducer>::new(tally());
        store.dispatch(TallyAction::Peek);
        assert_eq!(store.current().errors, vec!["needs-runtime".to_string()]);
    }

    #[test]
    fn reducer_panic_is_fatal() {
        let store = Store::<TallyReducer>::new(tally());
        store.dispatch(TallyAction::Add(2));
        let handle = store.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            handle.dispatch(TallyAction::Explode)
        }));
        assert!(result.is_err());
        // The failed dispatch did not commit anything.
        assert_eq!(store.current().count, 2);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn history_disabled_makes_undo_a_boundary() {
        let store = Store::<TallyReducer>::builder().history(None).build(tally());
        store.dispatch(TallyAction::Add(1));
        store.undo();
        assert_eq!(store.current().count, 1);
        assert!(store.history().is_none());
    }

    #[test]
    fn resume_starts_at_history_position() {
        let store = Store::<TallyReducer>::new(tally());
        store.dispatch(TallyAction::Add(1));
        store.dispatch(TallyAction::Add(2));
        store.undo();
        let history = store.history().unwrap();

        let resumed = Store::<TallyReducer>::builder().resume(history).build(tally());
        assert_eq!(resumed.current().count, 1);
        resumed.redo();
        assert_eq!(resumed.current().count, 3);
    }
}
