use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fields this build does not know about, kept verbatim.
///
/// Flatten it into a serialized struct (`#[serde(flatten)]`) so a document
/// written by a newer version survives a load/save cycle through this one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extras(BTreeMap<String, serde_json::Value>);

impl Extras {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
