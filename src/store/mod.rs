//! Unidirectional store: actions in, reducer, new model out.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Store queue ──→ Reducer ──→ (Model, Effects)
//!    ↑                                      │        │
//!    │                         History ←────┤        │
//!    │                       Subscribers ←──┘        │
//!    └────────────── Effect runner ←────────────────┘
//! ```
//!
//! - **Model**: immutable application state, shared by `Arc`
//! - **Action**: tagged description of an intended transition
//! - **Reducer**: pure function producing the next model and its effects

mod action;
mod deps;
mod engine;
mod model;
mod reducer;
mod subscription;

pub use action::{Action, ActionRecord};
pub use deps::Deps;
pub use engine::{Change, ChangeCause, DispatchMode, Store, StoreBuilder, DEFAULT_HISTORY_ENTRIES};
pub use model::Model;
pub use reducer::{Reducer, Transition};
pub use subscription::Subscription;

pub(crate) use reducer::try_reduce;
