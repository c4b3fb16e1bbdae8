//! A deterministic store/cursor/effect/history kernel over persistent
//! values, and the shader uniform editor built on it.

pub mod codec;
pub mod config;
pub mod cursor;
pub mod doc;
pub mod effect;
pub mod error;
pub mod history;
pub mod logging;
pub mod persist;
pub mod replay;
pub mod store;
pub mod ui;
