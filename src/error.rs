//! Error taxonomy shared by the kernel.
//!
//! Reaching a history boundary is not an error; see [`crate::history::Seek`].

use std::any::Any;
use std::path::PathBuf;

use thiserror::Error;

/// An effect's internal failure, caught by the effect runner.
///
/// Reducers turn this into an ordinary action through
/// [`crate::store::Reducer::effect_failed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("effect '{effect}' failed: {message}")]
pub struct EffectFailure {
    pub effect: String,
    pub message: String,
}

/// Errors surfaced to the caller of a load.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Not a {expected} document (format '{found}')")]
    WrongFormat { expected: &'static str, found: String },

    #[error("Document needs reader version {required} (written as version {found}), this build reads up to {supported}")]
    IncompatibleVersion {
        found: u32,
        required: u32,
        supported: u32,
    },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while replaying an action log.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The reducer panicked. This is a programming error in the reducer,
    /// reported here instead of aborting so the offending record can be found.
    #[error("Reducer contract violation at log entry {index}: {message}")]
    ReducerContractViolation { index: usize, message: String },

    #[error("Action log starts from a state this build cannot read: {0}")]
    Start(#[source] DecodeError),

    #[error("Line {line} of the action log is not a log entry: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read action log: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
