//! Deferred side effects and the capabilities they run with.
//!
//! Reducers return [`Effect`] values; the store runs them after the reducer
//! has returned and the new model is published. Effects talk back to the
//! store only through [`Context::dispatch`].

mod cancel;
mod context;
mod deferred;

pub use cancel::CancelToken;
pub use context::{Context, Dispatcher};
pub use deferred::{Effect, EffectResult};

pub(crate) use deferred::Body;
