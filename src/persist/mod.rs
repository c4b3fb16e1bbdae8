//! Immutable, structurally shared containers.
//!
//! Every container clones in O(1) and shares unchanged storage between
//! versions. `ptr_eq` exposes identity so callers can assert that a field left
//! alone by a transition is the same allocation, not merely an equal value.

mod boxed;
mod map;
mod set;
mod vector;

pub use boxed::Boxed;
pub use map::Map;
pub use set::Set;
pub use vector::Vector;
