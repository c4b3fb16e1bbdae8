//! Capabilities handed to an effect when it runs.

use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;

use super::cancel::CancelToken;
use crate::store::Deps;

/// A capability to enqueue actions into a store.
///
/// Holds no strong reference to the store: once the store is gone, dispatch
/// reports `false` and the action is dropped.
pub struct Dispatcher<A> {
    send: Arc<dyn Fn(A) -> bool + Send + Sync>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            send: Arc::clone(&self.send),
        }
    }
}

impl<A: 'static> Dispatcher<A> {
    pub fn new(send: impl Fn(A) -> bool + Send + Sync + 'static) -> Self {
        Self {
            send: Arc::new(send),
        }
    }

    /// Enqueues `action`. Returns false when the target store no longer exists.
    pub fn dispatch(&self, action: A) -> bool {
        (self.send)(action)
    }

    /// Adapts this dispatcher to a narrower action type.
    pub fn scoped<B: 'static>(&self, wrap: impl Fn(B) -> A + Send + Sync + 'static) -> Dispatcher<B> {
        let send = Arc::clone(&self.send);
        Dispatcher::new(move |action| send(wrap(action)))
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatcher")
    }
}

/// Execution context for one effect run.
pub struct Context<A> {
    dispatcher: Dispatcher<A>,
    deps: Arc<Deps>,
    cancel: Option<CancelToken>,
}

impl<A> Clone for Context<A> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            deps: Arc::clone(&self.deps),
            cancel: self.cancel.clone(),
        }
    }
}

impl<A: 'static> Context<A> {
    pub fn new(dispatcher: Dispatcher<A>, deps: Arc<Deps>, cancel: Option<CancelToken>) -> Self {
        Self {
            dispatcher,
            deps,
            cancel,
        }
    }

    /// Dispatches into the store that is running this effect.
    ///
    /// Refused once the effect's cancel token fires.
    pub fn dispatch(&self, action: A) -> bool {
        if self.is_cancelled() {
            tracing::debug!("dropping dispatch from cancelled effect");
            return false;
        }
        self.dispatcher.dispatch(action)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    pub fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }

    pub fn dep<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.deps.get::<T>()
    }

    /// Like [`Context::dep`], but a missing service is an effect failure.
    pub fn require<T: Send + Sync + 'static>(&self) -> anyhow::Result<Arc<T>> {
        self.dep::<T>()
            .ok_or_else(|| anyhow!("missing dependency {}", std::any::type_name::<T>()))
    }

    pub(crate) fn scoped<B: 'static>(&self, wrap: impl Fn(B) -> A + Send + Sync + 'static) -> Context<B> {
        Context {
            dispatcher: self.dispatcher.scoped(wrap),
            deps: Arc::clone(&self.deps),
            cancel: self.cancel.clone(),
        }
    }
}
