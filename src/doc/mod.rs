//! The shader document edited by the application: model, actions,
//! reducers and the services their effects use.

mod action;
mod clock;
pub mod files;
mod model;
mod pipeline;
mod reducer;
mod uniform;

pub use action::{DocAction, ProjectAction};
pub use clock::ShaderClock;
pub use model::{Document, Project, DEFAULT_SHADER};
pub use pipeline::{BuildStatus, Pipeline, Program};
pub use reducer::{DocReducer, ProjectReducer};
pub use uniform::{Uniform, TIME_UNIFORM};

use crate::store::Deps;

/// Services every document effect expects.
pub fn services() -> Deps {
    Deps::new().with(Pipeline::new()).with(ShaderClock::new())
}
