//! Reducer trait and the transition it returns.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::action::Action;
use super::model::Model;
use crate::effect::Effect;
use crate::error::EffectFailure;

/// Result of one reducer call: the next model and the effects to run.
pub struct Transition<M, A> {
    pub model: M,
    pub effects: Vec<Effect<A>>,
}

impl<M, A: Send + 'static> Transition<M, A> {
    /// A transition with no effects.
    pub fn new(model: M) -> Self {
        Self {
            model,
            effects: Vec::new(),
        }
    }

    pub fn with(mut self, effect: Effect<A>) -> Self {
        self.effects.push(effect);
        self
    }

    /// Maps model and effects into a parent reducer's types.
    pub fn lift<N, B: Send + 'static>(
        self,
        model: impl FnOnce(M) -> N,
        wrap: impl Fn(A) -> B + Clone + Send + Sync + 'static,
    ) -> Transition<N, B> {
        Transition {
            model: model(self.model),
            effects: self
                .effects
                .into_iter()
                .map(|effect| effect.map(wrap.clone()))
                .collect(),
        }
    }
}

impl<M: std::fmt::Debug, A: std::fmt::Debug> std::fmt::Debug for Transition<M, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("model", &self.model)
            .field("effects", &self.effects)
            .finish()
    }
}

/// Reducer transforms a model based on actions.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure, total function: (Model, Action) -> (Model, Effects).
/// A panic inside `reduce` is a contract violation and is fatal to the
/// dispatch that triggered it.
pub trait Reducer: 'static {
    /// The model type this reducer operates on.
    type Model: Model;

    /// The action type this reducer handles.
    type Action: Action;

    /// Process an action and return the next model plus deferred effects.
    fn reduce(model: Self::Model, action: Self::Action) -> Transition<Self::Model, Self::Action>;

    /// Whether committing `action` appends a history entry.
    ///
    /// Transient actions (animation ticks, uploads) still commit and notify,
    /// they are just not undoable steps.
    fn records(_action: &Self::Action) -> bool {
        true
    }

    /// Effects to run after an undo, redo or jump makes `model` current.
    ///
    /// History moves do not go through `reduce`, so services that mirror the
    /// model (uploaded GPU state, open files) resync here.
    fn on_travel(_model: &Self::Model) -> Vec<Effect<Self::Action>> {
        Vec::new()
    }

    /// Converts an effect failure into an action. `None` drops the failure
    /// after logging it.
    fn effect_failed(_failure: EffectFailure) -> Option<Self::Action> {
        None
    }
}

/// Runs `R::reduce`, catching a panic instead of unwinding through the caller.
pub(crate) fn try_reduce<R: Reducer>(
    model: R::Model,
    action: R::Action,
) -> Result<Transition<R::Model, R::Action>, Box<dyn Any + Send>> {
    panic::catch_unwind(AssertUnwindSafe(move || R::reduce(model, action)))
}
