use std::sync::Arc;
use std::time::SystemTime;

use crate::store::ActionRecord;

/// One recorded model version.
///
/// Entries never change after they are recorded. `action` is `None` for the
/// initial model.
pub struct Entry<M, A> {
    pub sequence: u64,
    pub model: Arc<M>,
    pub action: Option<A>,
    /// A loaded action record this build could not decode. Kept so saving
    /// the history writes it back unchanged.
    pub unknown_action: Option<ActionRecord>,
    pub recorded_at: SystemTime,
}

impl<M, A: Clone> Clone for Entry<M, A> {
    fn clone(&self) -> Self {
        Self {
            sequence: self.sequence,
            model: Arc::clone(&self.model),
            action: self.action.clone(),
            unknown_action: self.unknown_action.clone(),
            recorded_at: self.recorded_at,
        }
    }
}

impl<M: std::fmt::Debug, A: std::fmt::Debug> std::fmt::Debug for Entry<M, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("sequence", &self.sequence)
            .field("action", &self.action)
            .field("unknown_action", &self.unknown_action)
            .field("model", &self.model)
            .finish()
    }
}

/// Result of moving the history position.
#[derive(Debug, Clone)]
pub enum Seek<M> {
    Moved { sequence: u64, model: Arc<M> },
    /// Nothing to move to. The position is unchanged.
    AtBoundary,
}

impl<M> Seek<M> {
    pub fn is_boundary(&self) -> bool {
        matches!(self, Seek::AtBoundary)
    }

    pub fn model(&self) -> Option<&Arc<M>> {
        match self {
            Seek::Moved { model, .. } => Some(model),
            Seek::AtBoundary => None,
        }
    }
}
