//! Live views into a store's model for the render loop.
//!
//! A [`Reader`] only reads. A [`Cursor`] can also write, by turning a new
//! value into an action and dispatching it. Both narrow with [`Lens`]es.

mod lens;
mod view;

pub use lens::Lens;
pub use view::{Cursor, Reader};
