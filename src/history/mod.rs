//! Undo/redo history of committed models.

mod entry;
mod timeline;

pub use entry::{Entry, Seek};
pub use timeline::History;
