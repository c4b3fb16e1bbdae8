//! Base trait for application state.

/// Marker trait for models held by a [`super::Store`].
///
/// Models should be:
/// - Immutable (every transition returns a new value)
/// - Cheap to clone (built from [`crate::persist`] containers)
/// - Comparable (PartialEq for detecting changes)
pub trait Model: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static {}
