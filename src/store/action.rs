//! Actions and their durable, tagged form.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Marker trait for actions.
///
/// Actions represent:
/// - User intents translated by the render loop
/// - Follow-ups dispatched by effects
/// - Failures reported by the effect runner
pub trait Action: Clone + std::fmt::Debug + Send + Sync + 'static {}

/// An action as it appears in a log: a type tag plus an opaque payload.
///
/// Action enums are expected to use adjacently tagged serde
/// (`#[serde(tag = "type", content = "data")]`), which maps onto this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl ActionRecord {
    pub fn new(tag: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            tag: tag.into(),
            data,
        }
    }

    pub fn from_action<A: Serialize>(action: &A) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(action)?)
    }

    /// Decodes the record into a concrete action.
    ///
    /// Returns `None` when the tag (or a nested tag) is not one this build
    /// knows. Such records are skipped, never treated as errors, so logs
    /// written by a newer version still replay.
    pub fn decode<A: DeserializeOwned>(&self) -> Option<A> {
        let value = if self.data.is_null() {
            serde_json::json!({ "type": self.tag })
        } else {
            serde_json::json!({ "type": self.tag, "data": self.data })
        };
        match serde_json::from_value(value) {
            Ok(action) => Some(action),
            Err(e) => {
                tracing::debug!(tag = %self.tag, error = %e, "skipping unrecognized action record");
                None
            }
        }
    }
}
