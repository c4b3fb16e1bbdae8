//! Effect values returned by reducers.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::cancel::CancelToken;
use super::context::Context;

/// Outcome of an effect body. Errors become [`crate::error::EffectFailure`]s.
pub type EffectResult = anyhow::Result<()>;

pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = EffectResult> + Send>>;

pub(crate) enum Body<A> {
    /// Reducer-only follow-up: the actions are dispatched as soon as the effect runs.
    Dispatch(Vec<A>),
    /// Runs synchronously on the draining thread, outside the reducer.
    Run(Box<dyn FnOnce(&Context<A>) -> EffectResult + Send>),
    /// Spawned onto the store's async runtime.
    Task(Box<dyn FnOnce(Context<A>) -> BoxFuture + Send>),
    /// Dispatches `action` once `after` has elapsed.
    Delay { after: Duration, action: A },
}

/// A deferred unit of work produced by a reducer.
///
/// An effect never sees the model. It receives a [`Context`] when it runs,
/// so follow-up dispatches always reach the live store.
pub struct Effect<A> {
    label: Cow<'static, str>,
    body: Body<A>,
    cancel: Option<CancelToken>,
}

impl<A: Send + 'static> Effect<A> {
    fn from_body(label: impl Into<Cow<'static, str>>, body: Body<A>) -> Self {
        Self {
            label: label.into(),
            body,
            cancel: None,
        }
    }

    /// Dispatches a single follow-up action.
    pub fn dispatch(label: impl Into<Cow<'static, str>>, action: A) -> Self {
        Self::from_body(label, Body::Dispatch(vec![action]))
    }

    /// Dispatches several follow-up actions in order.
    pub fn dispatch_all(label: impl Into<Cow<'static, str>>, actions: Vec<A>) -> Self {
        Self::from_body(label, Body::Dispatch(actions))
    }

    pub fn run<F>(label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: FnOnce(&Context<A>) -> EffectResult + Send + 'static,
    {
        Self::from_body(label, Body::Run(Box::new(f)))
    }

    pub fn task<F, Fut>(label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: FnOnce(Context<A>) -> Fut + Send + 'static,
        Fut: Future<Output = EffectResult> + Send + 'static,
    {
        Self::from_body(
            label,
            Body::Task(Box::new(move |ctx| Box::pin(f(ctx)) as BoxFuture)),
        )
    }

    pub fn delay(label: impl Into<Cow<'static, str>>, after: Duration, action: A) -> Self {
        Self::from_body(label, Body::Delay { after, action })
    }

    /// Attaches a cancel token checked before every dispatch the effect makes.
    pub fn cancellable(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Lifts an effect of a sub-reducer into the parent action type.
    pub fn map<B: Send + 'static>(self, wrap: impl Fn(A) -> B + Send + Sync + 'static) -> Effect<B> {
        let body = match self.body {
            Body::Dispatch(actions) => Body::Dispatch(actions.into_iter().map(&wrap).collect()),
            Body::Run(f) => Body::Run(Box::new(move |ctx: &Context<B>| f(&ctx.scoped(wrap)))),
            Body::Task(f) => Body::Task(Box::new(move |ctx: Context<B>| f(ctx.scoped(wrap)))),
            Body::Delay { after, action } => Body::Delay {
                after,
                action: wrap(action),
            },
        };
        Effect {
            label: self.label,
            body,
            cancel: self.cancel,
        }
    }

    pub(crate) fn into_parts(self) -> (Cow<'static, str>, Body<A>, Option<CancelToken>) {
        (self.label, self.body, self.cancel)
    }
}

impl<A: fmt::Debug> Effect<A> {
    /// Stable, comparable description of what the effect will do.
    pub fn describe(&self) -> String {
        match &self.body {
            Body::Dispatch(actions) => format!("{}: dispatch {:?}", self.label, actions),
            Body::Run(_) => format!("{}: run", self.label),
            Body::Task(_) => format!("{}: task", self.label),
            Body::Delay { after, action } => {
                format!("{}: after {:?} dispatch {:?}", self.label, after, action)
            }
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("description", &self.describe())
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}
