use serde::{Deserialize, Serialize};

use crate::store::{DispatchMode, DEFAULT_HISTORY_ENTRIES};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// How the application store processes dispatched actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "immediate" drains on every dispatch, "deferred" once per frame
    /// (default: deferred).
    #[serde(default = "default_dispatch")]
    pub dispatch: DispatchMode,
}

/// Undo/redo history settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Record undoable steps at all (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Oldest entries are dropped beyond this many (default: 512).
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

/// Render loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Frame interval in milliseconds (default: 33).
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// Advance the `time` uniform every frame while it exists (default: true).
    #[serde(default = "default_true")]
    pub animate_time: bool,
}

fn default_dispatch() -> DispatchMode {
    DispatchMode::Deferred
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> usize {
    DEFAULT_HISTORY_ENTRIES
}

fn default_tick_rate_ms() -> u64 {
    33
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dispatch: default_dispatch(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            animate_time: true,
        }
    }
}

impl HistoryConfig {
    /// Capacity to hand to the store builder; `None` when disabled.
    pub fn capacity(&self) -> Option<usize> {
        self.enabled.then_some(self.max_entries)
    }
}
